//! Streamed line-delimited ingestion.
//!
//! Consumes an already-exported dataset stream without buffering it
//! whole: a line-delimited JSON file, or standard input when the path is
//! `-`. Record format matches the JSONL adapter. Because samples are
//! pulled lazily, a downstream `take` (the CLI `--limit` flag) stops the
//! read early instead of draining the stream.

use crate::adapters::jsonl::{parse_record, source_name, DEFAULT_TEXT_COLUMN};
use crate::adapters::DatasetAdapter;
use crate::engine::SampleStream;
use crate::error::{GenError, Result};
use crate::types::Label;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Records between progress reports.
const PROGRESS_INTERVAL: usize = 2000;

#[derive(Debug, Clone)]
pub struct StreamAdapter {
    label: Label,
    text_column: String,
}

impl StreamAdapter {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
        }
    }

    /// Read sample text from `column` instead of the default.
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = column.into();
        self
    }
}

impl DatasetAdapter for StreamAdapter {
    fn load<'a>(&'a self, path: &Path) -> Result<SampleStream<'a>> {
        let (reader, source): (Box<dyn BufRead + Send>, String) =
            if path.as_os_str() == "-" {
                (Box::new(BufReader::new(std::io::stdin())), "stdin".to_string())
            } else {
                let file = File::open(path).map_err(|e| {
                    GenError::AdapterError(format!("cannot open {}: {e}", path.display()))
                })?;
                (Box::new(BufReader::new(file)), source_name(path))
            };

        let text_column = self.text_column.clone();
        let label = self.label;
        let mut seen = 0usize;
        Ok(Box::new(reader.lines().enumerate().filter_map(
            move |(idx, line)| {
                let line_no = idx + 1;
                seen += 1;
                if seen % PROGRESS_INTERVAL == 0 {
                    debug!(records = seen, source = %source, "streaming progress");
                }
                match line {
                    Err(e) => Some(Err(GenError::RecordError(format!(
                        "{source} line {line_no}: {e}"
                    )))),
                    Ok(line) if line.trim().is_empty() => None,
                    Ok(line) => {
                        Some(parse_record(&line, line_no, &source, &text_column, label))
                    }
                }
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_streams_jsonl_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..5 {
            writeln!(file, "{{\"text\": \"sample number {i}\"}}").unwrap();
        }

        let adapter = StreamAdapter::new(Label::Adversarial);
        let samples: Vec<_> = adapter
            .load(file.path())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[4].text, "sample number 4");
    }

    #[test]
    fn test_take_stops_early() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..100 {
            writeln!(file, "{{\"text\": \"record {i}\"}}").unwrap();
        }

        let adapter = StreamAdapter::new(Label::Benign);
        let samples: Vec<_> = adapter
            .load(file.path())
            .unwrap()
            .take(3)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].text, "record 2");
    }

    #[test]
    fn test_bad_records_are_isolated() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", r#"{"text": "good"}"#).unwrap();
        writeln!(file, "garbage line").unwrap();
        writeln!(file, "{}", r#"{"text": "also good"}"#).unwrap();

        let adapter = StreamAdapter::new(Label::Adversarial);
        let mut ok = 0;
        let mut err = 0;
        for item in adapter.load(file.path()).unwrap() {
            match item {
                Ok(_) => ok += 1,
                Err(_) => err += 1,
            }
        }
        assert_eq!(ok, 2);
        assert_eq!(err, 1);
    }

    #[test]
    fn test_custom_text_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", r#"{"content": "streamed text"}"#).unwrap();

        let adapter = StreamAdapter::new(Label::Adversarial).with_text_column("content");
        let samples: Vec<_> = adapter
            .load(file.path())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(samples[0].text, "streamed text");
    }

    #[test]
    fn test_missing_file_is_adapter_error() {
        let adapter = StreamAdapter::new(Label::Benign);
        assert!(matches!(
            adapter.load(Path::new("/nonexistent/export.jsonl")),
            Err(GenError::AdapterError(_))
        ));
    }
}

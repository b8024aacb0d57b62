//! Line-delimited JSON ingestion.
//!
//! One JSON object per line, text under a configurable column with a
//! fallback to `prompt` for datasets exported from prompt collections.
//! This is also the format `yara-gen prepare` writes, so a prepared
//! corpus round-trips through this adapter unchanged.

use crate::adapters::DatasetAdapter;
use crate::engine::SampleStream;
use crate::error::{GenError, Result};
use crate::types::{Label, TextSample};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Column consulted first for the sample text.
pub const DEFAULT_TEXT_COLUMN: &str = "text";
/// Column consulted when the primary one is absent.
const FALLBACK_TEXT_COLUMN: &str = "prompt";

/// Adapter for the canonical prepared format.
#[derive(Debug, Clone)]
pub struct JsonlAdapter {
    label: Label,
    text_column: String,
}

impl JsonlAdapter {
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

impl DatasetAdapter for JsonlAdapter {
    fn load<'a>(&'a self, path: &Path) -> Result<SampleStream<'a>> {
        let file = File::open(path).map_err(|e| {
            GenError::AdapterError(format!("cannot open {}: {e}", path.display()))
        })?;
        Ok(read_lines(
            BufReader::new(file),
            source_name(path),
            self.text_column.clone(),
            self.label,
        ))
    }
}

/// Turn a buffered line source into a sample stream.
///
/// Blank lines are skipped silently; undecodable lines become `Err`
/// items carrying the source name and one-based line number.
pub(crate) fn read_lines<R>(
    reader: R,
    source: String,
    text_column: String,
    label: Label,
) -> SampleStream<'static>
where
    R: BufRead + Send + 'static,
{
    Box::new(reader.lines().enumerate().filter_map(move |(idx, line)| {
        let line_no = idx + 1;
        match line {
            Err(e) => Some(Err(GenError::RecordError(format!(
                "{source} line {line_no}: {e}"
            )))),
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_record(&line, line_no, &source, &text_column, label)),
        }
    }))
}

/// Decode one JSON line into a labeled sample.
pub(crate) fn parse_record(
    line: &str,
    line_no: usize,
    source: &str,
    text_column: &str,
    label: Label,
) -> Result<TextSample> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        GenError::RecordError(format!("{source} line {line_no}: {e}"))
    })?;
    let text = value
        .get(text_column)
        .and_then(Value::as_str)
        .or_else(|| value.get(FALLBACK_TEXT_COLUMN).and_then(Value::as_str))
        .ok_or_else(|| {
            GenError::RecordError(format!(
                "{source} line {line_no}: no string field {text_column:?} or {FALLBACK_TEXT_COLUMN:?}"
            ))
        })?;
    let record_source = value
        .get("source")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{source}:{line_no}"));
    Ok(TextSample::new(text, record_source, label))
}

/// Short display name for a dataset path.
pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

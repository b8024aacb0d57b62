//! Plain-text ingestion, one sample per non-empty line.

use crate::adapters::jsonl::source_name;
use crate::adapters::DatasetAdapter;
use crate::engine::SampleStream;
use crate::error::{GenError, Result};
use crate::types::{Label, TextSample};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TextAdapter {
    label: Label,
}

impl TextAdapter {
    pub fn new(label: Label) -> Self {
        Self { label }
    }
}

impl DatasetAdapter for TextAdapter {
    fn load<'a>(&'a self, path: &Path) -> Result<SampleStream<'a>> {
        let file = File::open(path).map_err(|e| {
            GenError::AdapterError(format!("cannot open {}: {e}", path.display()))
        })?;
        let source = source_name(path);
        let label = self.label;
        Ok(Box::new(BufReader::new(file).lines().enumerate().filter_map(
            move |(idx, line)| {
                let line_no = idx + 1;
                match line {
                    Err(e) => Some(Err(GenError::RecordError(format!(
                        "{source} line {line_no}: {e}"
                    )))),
                    Ok(line) if line.trim().is_empty() => None,
                    Ok(line) => Some(Ok(TextSample::new(
                        line,
                        format!("{source}:{line_no}"),
                        label,
                    ))),
                }
            },
        )))
    }
}

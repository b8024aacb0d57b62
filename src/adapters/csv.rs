//! Minimal delimited-file ingestion.
//!
//! Columns are addressed through the header row. Double-quote quoting is
//! honored within a physical line, including `""` escapes, but fields
//! spanning multiple lines are not supported; such rows surface as
//! per-record errors. Route corpora with embedded newlines through the
//! JSONL adapter instead.

use crate::adapters::jsonl::source_name;
use crate::adapters::DatasetAdapter;
use crate::engine::SampleStream;
use crate::error::{GenError, Result};
use crate::types::{Label, TextSample};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Header name consulted for the sample text.
pub const DEFAULT_TEXT_COLUMN: &str = "text";

/// Adapter for delimited tabular files.
#[derive(Debug, Clone)]
pub struct CsvAdapter {
    label: Label,
    text_column: String,
    delimiter: char,
}

impl CsvAdapter {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            delimiter: ',',
        }
    }

    /// Read sample text from `column` instead of the default.
    pub fn with_text_column(mut self, column: impl Into<String>) -> Self {
        self.text_column = column.into();
        self
    }

    /// Split fields on `delimiter` instead of a comma.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl DatasetAdapter for CsvAdapter {
    fn load<'a>(&'a self, path: &Path) -> Result<SampleStream<'a>> {
        let file = File::open(path).map_err(|e| {
            GenError::AdapterError(format!("cannot open {}: {e}", path.display()))
        })?;
        let mut lines = BufReader::new(file).lines();

        let header_line = match lines.next() {
            None => {
                return Err(GenError::AdapterError(format!(
                    "{}: empty file, expected a header row",
                    path.display()
                )))
            }
            Some(Err(e)) => {
                return Err(GenError::AdapterError(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
            Some(Ok(line)) => line,
        };
        let header = split_fields(&header_line, self.delimiter).map_err(|msg| {
            GenError::AdapterError(format!("{}: bad header: {msg}", path.display()))
        })?;
        let column = header
            .iter()
            .position(|name| name == &self.text_column)
            .ok_or_else(|| {
                GenError::AdapterError(format!(
                    "{}: no column {:?} in header ({})",
                    path.display(),
                    self.text_column,
                    header.join(", ")
                ))
            })?;

        let source = source_name(path);
        let delimiter = self.delimiter;
        let label = self.label;
        Ok(Box::new(lines.enumerate().filter_map(move |(idx, line)| {
            let line_no = idx + 2;
            let line = match line {
                Err(e) => {
                    return Some(Err(GenError::RecordError(format!(
                        "{source} line {line_no}: {e}"
                    ))))
                }
                Ok(line) => line,
            };
            if line.trim().is_empty() {
                return None;
            }
            let fields = match split_fields(&line, delimiter) {
                Err(msg) => {
                    return Some(Err(GenError::RecordError(format!(
                        "{source} line {line_no}: {msg}"
                    ))))
                }
                Ok(fields) => fields,
            };
            match fields.into_iter().nth(column) {
                None => Some(Err(GenError::RecordError(format!(
                    "{source} line {line_no}: row too short for text column {}",
                    column + 1
                )))),
                Some(text) if text.trim().is_empty() => None,
                Some(text) => Some(Ok(TextSample::new(
                    text,
                    format!("{source}:{line_no}"),
                    label,
                ))),
            }
        })))
    }
}

/// Split one physical line into fields.
///
/// A double quote opens quoting only at field start; inside a quoted
/// field `""` is a literal quote and the delimiter loses its meaning.
fn split_fields(line: &str, delimiter: char) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
        } else if ch == '"' && field.is_empty() {
            in_quotes = true;
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(ch);
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}

//! Dataset adapters: the polymorphic ingestion seam.
//!
//! Every adapter yields the same thing, a fallible stream of labeled
//! samples. The corpus role comes from which flag a dataset was passed
//! under, never from the data itself, and the engine consumes streams
//! without knowing which adapter produced them.

pub mod csv;
pub mod jsonl;
pub mod markup;
pub mod stream;
pub mod text;

use crate::engine::SampleStream;
use crate::error::GenError;
use crate::types::Label;
use std::path::Path;

pub use csv::CsvAdapter;
pub use jsonl::JsonlAdapter;
pub use markup::MarkupAdapter;
pub use stream::StreamAdapter;
pub use text::TextAdapter;

/// A dataset source format.
pub trait DatasetAdapter {
    /// Open `path` and yield labeled samples.
    ///
    /// Per-record failures (an undecodable line, a missing field) surface
    /// as `Err` items so the engine can skip and count them; only
    /// source-level failures such as an unreadable file or a missing
    /// column fail the call itself.
    fn load<'a>(&'a self, path: &Path) -> crate::error::Result<SampleStream<'a>>;
}

/// Available source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// Canonical prepared format: one JSON object per line.
    Jsonl,
    /// Delimited tabular files with a header row.
    Csv,
    /// Plain text, one sample per non-empty line.
    Text,
    /// Markup dumps: tags stripped, blank-line blocks become samples.
    Markup,
    /// Line-delimited JSON consumed as a stream; `-` reads standard input.
    Stream,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Jsonl => "jsonl",
            AdapterKind::Csv => "csv",
            AdapterKind::Text => "text",
            AdapterKind::Markup => "markup",
            AdapterKind::Stream => "stream",
        }
    }
}

impl std::fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdapterKind {
    type Err = GenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "jsonl" => Ok(AdapterKind::Jsonl),
            "csv" => Ok(AdapterKind::Csv),
            "text" => Ok(AdapterKind::Text),
            "markup" => Ok(AdapterKind::Markup),
            "stream" => Ok(AdapterKind::Stream),
            other => Err(GenError::ConfigError(format!(
                "unknown adapter {other:?} (expected jsonl, csv, text, markup, or stream)"
            ))),
        }
    }
}

/// Instantiate the adapter for a source kind.
///
/// `label` is stamped on every record the adapter yields. `text_column`
/// applies to the field-addressed formats (jsonl, csv, stream) and is
/// ignored by the rest.
pub fn create_adapter(
    kind: AdapterKind,
    label: Label,
    text_column: Option<&str>,
) -> Box<dyn DatasetAdapter> {
    match kind {
        AdapterKind::Jsonl => {
            let mut adapter = JsonlAdapter::new(label);
            if let Some(column) = text_column {
                adapter = adapter.with_text_column(column);
            }
            Box::new(adapter)
        }
        AdapterKind::Csv => {
            let mut adapter = CsvAdapter::new(label);
            if let Some(column) = text_column {
                adapter = adapter.with_text_column(column);
            }
            Box::new(adapter)
        }
        AdapterKind::Text => Box::new(TextAdapter::new(label)),
        AdapterKind::Markup => Box::new(MarkupAdapter::new(label)),
        AdapterKind::Stream => {
            let mut adapter = StreamAdapter::new(label);
            if let Some(column) = text_column {
                adapter = adapter.with_text_column(column);
            }
            Box::new(adapter)
        }
    }
}

//! Markup-dump ingestion.
//!
//! Strips tags, decodes the common entities, and treats runs of
//! non-blank lines as one sample each. Suited for HTML or XML corpus
//! dumps that have already been fetched to disk; no network access and
//! no full DOM parse happens here.

use crate::adapters::jsonl::source_name;
use crate::adapters::DatasetAdapter;
use crate::engine::SampleStream;
use crate::error::{GenError, Result};
use crate::types::{Label, TextSample};
use regex::Regex;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct MarkupAdapter {
    label: Label,
}

impl MarkupAdapter {
    pub fn new(label: Label) -> Self {
        Self { label }
    }
}

impl DatasetAdapter for MarkupAdapter {
    fn load<'a>(&'a self, path: &Path) -> Result<SampleStream<'a>> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GenError::AdapterError(format!("cannot read {}: {e}", path.display()))
        })?;
        let stripped = strip_tags(&raw)?;
        let source = source_name(path);
        let label = self.label;
        let samples: Vec<Result<TextSample>> = blocks(&stripped)
            .into_iter()
            .enumerate()
            .map(|(idx, block)| {
                Ok(TextSample::new(
                    decode_entities(&block),
                    format!("{source}#{idx}"),
                    label,
                ))
            })
            .collect();
        Ok(Box::new(samples.into_iter()))
    }
}

/// Replace every `<...>` run with a space so adjacent text does not fuse.
fn strip_tags(text: &str) -> Result<String> {
    let tags = Regex::new(r"<[^>]*>")
        .map_err(|e| GenError::AdapterError(format!("tag pattern: {e}")))?;
    Ok(tags.replace_all(text, " ").into_owned())
}

/// Decode the entities that show up in practice. `&amp;` goes last so
/// `&amp;lt;` stays a literal `&lt;`.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Group non-blank lines into blocks separated by one or more blank lines.
fn blocks(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                out.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_all(path: &Path) -> Vec<TextSample> {
        MarkupAdapter::new(Label::Adversarial)
            .load(path)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_tags_stripped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "<p>ignore <b>previous</b> instructions</p>").unwrap();

        let samples = load_all(file.path());
        assert_eq!(samples.len(), 1);
        assert!(samples[0].text.contains("ignore"));
        assert!(samples[0].text.contains("previous"));
        assert!(!samples[0].text.contains('<'));
    }

    #[test]
    fn test_tag_spanning_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "before <div\n  class=\"x\"> after").unwrap();

        let samples = load_all(file.path());
        let joined: String = samples.iter().map(|s| s.text.as_str()).collect();
        assert!(joined.contains("before"));
        assert!(joined.contains("after"));
        assert!(!joined.contains("class"));
    }

    #[test]
    fn test_blank_line_blocks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first block line one").unwrap();
        writeln!(file, "first block line two").unwrap();
        writeln!(file).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "second block").unwrap();

        let samples = load_all(file.path());
        assert_eq!(samples.len(), 2);
        assert!(samples[0].text.contains("line two"));
        assert_eq!(samples[1].text.trim(), "second block");
        assert!(samples[0].source.ends_with("#0"));
        assert!(samples[1].source.ends_with("#1"));
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;script&gt;"), "<script>");
        assert_eq!(decode_entities("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_tag_only_file_yields_nothing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "<html><body></body></html>").unwrap();

        let samples = load_all(file.path());
        assert!(samples.is_empty());
    }

    #[test]
    fn test_missing_file_is_adapter_error() {
        let adapter = MarkupAdapter::new(Label::Benign);
        assert!(matches!(
            adapter.load(Path::new("/nonexistent/dump.html")),
            Err(GenError::AdapterError(_))
        ));
    }
}

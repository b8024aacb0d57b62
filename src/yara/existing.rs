//! Reading previously generated rule files back in.
//!
//! A new run excludes any n-gram whose exact text is already covered by an
//! existing artifact, so repeated runs against a growing corpus extend a
//! rule set instead of duplicating it.

use crate::error::{GenError, Result};
use crate::types::ExistingRule;
use crate::yara::escape;
use regex::Regex;
use std::path::Path;
use tracing::warn;

/// Parse YARA source text into rule names and their quoted text patterns.
///
/// Only double-quoted text strings participate in exclusion; hex and regex
/// strings have no n-gram counterpart and are ignored, as are quoted meta
/// values (string definitions are recognized by their `$` prefix). A
/// pattern with a malformed escape is skipped with a warning rather than
/// failing the whole file.
pub fn parse_rules(text: &str) -> Result<Vec<ExistingRule>> {
    let rule_re = Regex::new(r"(?m)^\s*(?:private\s+|global\s+)*rule\s+([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| GenError::RuleParseError(e.to_string()))?;
    let string_re = Regex::new(r#"\$[A-Za-z0-9_]*\s*=\s*"((?:\\.|[^"\\])*)""#)
        .map_err(|e| GenError::RuleParseError(e.to_string()))?;

    let mut boundaries: Vec<(usize, String)> = Vec::new();
    for caps in rule_re.captures_iter(text) {
        if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
            boundaries.push((whole.start(), name.as_str().to_string()));
        }
    }

    let mut rules = Vec::with_capacity(boundaries.len());
    for (i, (start, name)) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(i + 1)
            .map(|(next_start, _)| *next_start)
            .unwrap_or(text.len());
        let segment = &text[*start..end];

        let mut patterns = Vec::new();
        for caps in string_re.captures_iter(segment) {
            if let Some(escaped) = caps.get(1) {
                match escape::unescape_string(escaped.as_str()) {
                    Ok(pattern) => patterns.push(pattern),
                    Err(err) => warn!("skipping pattern in rule {name}: {err}"),
                }
            }
        }

        rules.push(ExistingRule {
            name: name.clone(),
            patterns,
        });
    }
    Ok(rules)
}

/// Parse an existing rule file from disk.
pub fn parse_file(path: &Path) -> Result<Vec<ExistingRule>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        GenError::IoError(format!("cannot read rules file {}: {e}", path.display()))
    })?;
    parse_rules(&text)
}

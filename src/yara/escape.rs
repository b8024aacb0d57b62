//! YARA string escaping and rule identifier derivation.
//!
//! Escaping is byte accurate: text is emitted as printable ASCII with
//! `\"`, `\\`, `\t`, `\n`, `\r` for the characters YARA names and `\xNN`
//! for every other control or non-ASCII byte (multi-byte UTF-8 sequences
//! become one `\xNN` per byte). [`unescape_string`] is the exact inverse
//! and is used when reading previously generated artifacts back in.

use crate::error::{GenError, Result};

const MAX_SLUG_BYTES: usize = 32;

/// Escape a pattern for a double-quoted YARA string.
///
/// Fails on an empty pattern; a string with no bytes would make the rule
/// unsatisfiable and is treated as a serialization error for that rule.
pub fn escape_string(pattern: &str) -> Result<String> {
    if pattern.is_empty() {
        return Err(GenError::SerializationError(
            "empty pattern cannot be serialized".to_string(),
        ));
    }
    let mut out = String::with_capacity(pattern.len());
    for byte in pattern.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    Ok(out)
}

/// Reverse [`escape_string`], recovering the raw pattern text.
pub fn unescape_string(escaped: &str) -> Result<String> {
    let bytes = escaped.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let next = bytes.get(i + 1).ok_or_else(|| {
            GenError::RuleParseError(format!("dangling escape in {escaped:?}"))
        })?;
        match next {
            b'"' => out.push(b'"'),
            b'\\' => out.push(b'\\'),
            b't' => out.push(b'\t'),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b'x' => {
                let hex = escaped.get(i + 2..i + 4).ok_or_else(|| {
                    GenError::RuleParseError(format!("truncated hex escape in {escaped:?}"))
                })?;
                let value = u8::from_str_radix(hex, 16).map_err(|_| {
                    GenError::RuleParseError(format!("invalid hex escape \\x{hex} in {escaped:?}"))
                })?;
                out.push(value);
                i += 2;
            }
            other => {
                return Err(GenError::RuleParseError(format!(
                    "unknown escape \\{} in {escaped:?}",
                    *other as char
                )));
            }
        }
        i += 2;
    }
    String::from_utf8(out)
        .map_err(|_| GenError::RuleParseError(format!("escapes in {escaped:?} are not valid UTF-8")))
}

/// Whether `name` is usable as a YARA identifier (rule name or tag).
pub fn is_legal_identifier(name: &str) -> bool {
    if name.is_empty() || name.len() > 128 {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Deterministic, syntax-legal rule identifier.
///
/// `ngram_{rank:03}_{slug}` where the slug keeps the pattern's ASCII
/// alphanumerics (lowercased) and collapses everything else into single
/// underscores, truncated to a fixed budget. The rank prefix alone
/// guarantees uniqueness within a run; the slug exists for human readers.
pub fn rule_identifier(rank: usize, pattern: &str) -> String {
    let mut slug = String::with_capacity(MAX_SLUG_BYTES);
    for ch in pattern.chars() {
        if slug.len() >= MAX_SLUG_BYTES {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        format!("ngram_{rank:03}")
    } else {
        format!("ngram_{rank:03}_{slug}")
    }
}

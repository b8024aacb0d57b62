//! Deterministic rendering of generated rules into YARA source text.
//!
//! Rendering is pure: the same rules always produce the same bytes, with
//! no wall-clock time, hashing randomness, or environment influence.
//! File output is a thin convenience over [`render`].

use crate::error::{GenError, Result};
use crate::types::GeneratedRule;
use crate::yara::escape;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

/// Name stamped into the artifact header and every rule's metadata.
pub const GENERATOR_NAME: &str = "yara-gen";

/// Result of rendering a rule set.
///
/// A rule that cannot be serialized is dropped and counted here; it never
/// aborts the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub text: String,
    pub rules_emitted: usize,
    pub failures: usize,
}

/// Render a complete rule file.
///
/// An empty rule set yields a well-formed artifact containing only the
/// header comment.
pub fn render(rules: &[GeneratedRule]) -> RenderedArtifact {
    let mut rendered = Vec::with_capacity(rules.len());
    let mut failures = 0;
    for rule in rules {
        match render_rule(rule) {
            Ok(text) => rendered.push(text),
            Err(err) => {
                failures += 1;
                warn!("dropping rule {}: {err}", rule.name);
            }
        }
    }

    let mut text = format!(
        "/*\n    Auto-generated YARA rules. Do not edit by hand.\n    Generator: {GENERATOR_NAME}\n    Rules: {}\n*/\n",
        rendered.len()
    );
    for rule_text in &rendered {
        text.push('\n');
        text.push_str(rule_text);
    }

    RenderedArtifact {
        text,
        rules_emitted: rendered.len(),
        failures,
    }
}

/// Render the rules and write the artifact to `path`, creating parent
/// directories as needed.
pub fn write_file(path: &Path, rules: &[GeneratedRule]) -> Result<RenderedArtifact> {
    let artifact = render(rules);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &artifact.text)?;
    Ok(artifact)
}

fn render_rule(rule: &GeneratedRule) -> Result<String> {
    if !escape::is_legal_identifier(&rule.name) {
        return Err(GenError::SerializationError(format!(
            "illegal rule identifier {:?}",
            rule.name
        )));
    }
    if rule.strings.is_empty() {
        return Err(GenError::SerializationError(format!(
            "rule {} has no strings",
            rule.name
        )));
    }

    let mut out = String::new();
    out.push_str("rule ");
    out.push_str(&rule.name);

    // Tags serialize sorted and de-duplicated so artifacts never depend on
    // configuration order.
    let tags: BTreeSet<&str> = rule.tags.iter().map(String::as_str).collect();
    if !tags.is_empty() {
        out.push_str(" : ");
        let joined = tags.into_iter().collect::<Vec<_>>().join(" ");
        out.push_str(&joined);
    }

    out.push_str("\n{\n    meta:\n");
    out.push_str(&format!("        generated_by = \"{GENERATOR_NAME}\"\n"));
    if let Some(date) = &rule.date {
        out.push_str(&format!("        date = \"{}\"\n", escape::escape_string(date)?));
    }
    // YARA metadata has no float type; a fixed-precision string keeps the
    // score readable and the artifact stable.
    out.push_str(&format!("        score = \"{:.4}\"\n", rule.score));
    out.push_str(&format!(
        "        adversarial_matches = {}\n",
        rule.source_counts.adversarial
    ));
    out.push_str(&format!(
        "        benign_matches = {}\n",
        rule.source_counts.benign
    ));

    out.push_str("    strings:\n");
    for (i, string) in rule.strings.iter().enumerate() {
        let escaped = escape::escape_string(&string.value)?;
        out.push_str(&format!("        $s{i} = \"{escaped}\""));
        for modifier in &string.modifiers {
            out.push(' ');
            out.push_str(modifier);
        }
        out.push('\n');
    }

    out.push_str("    condition:\n        any of them\n}\n");
    Ok(out)
}

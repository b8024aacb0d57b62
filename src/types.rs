//! Core data model for rule generation.
//!
//! Types flow through the pipeline in one direction: adapters produce
//! [`TextSample`]s, aggregation and scoring produce [`Candidate`]s, selection
//! and serialization produce [`GeneratedRule`]s, and every run yields a
//! [`RunSummary`] describing what happened at each stage.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Corpus a sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Adversarial,
    Benign,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Adversarial => "adversarial",
            Label::Benign => "benign",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One labeled input document.
///
/// Samples are immutable once produced by an adapter and are dropped after
/// aggregation; only derived n-gram statistics survive them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSample {
    pub text: String,
    pub source: String,
    pub label: Label,
}

impl TextSample {
    pub fn new(text: impl Into<String>, source: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            label,
        }
    }

    pub fn adversarial(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(text, source, Label::Adversarial)
    }

    pub fn benign(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(text, source, Label::Benign)
    }
}

/// A scored n-gram candidate, frozen after scoring.
///
/// Counts are document frequencies: each field records in how many distinct
/// documents the n-gram appeared, never how many times.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Exact post-normalization n-gram text (tokens joined by single spaces).
    pub ngram: String,
    /// Length in tokens, always within the configured n-gram range.
    pub length: usize,
    pub adv_doc_count: usize,
    pub benign_doc_count: usize,
    pub adv_doc_total: usize,
    pub benign_doc_total: usize,
    pub score: f64,
}

impl Candidate {
    /// Fraction of adversarial documents containing this n-gram.
    pub fn adv_frequency(&self) -> f64 {
        ratio(self.adv_doc_count, self.adv_doc_total)
    }

    /// Fraction of benign documents containing this n-gram.
    pub fn benign_frequency(&self) -> f64 {
        ratio(self.benign_doc_count, self.benign_doc_total)
    }
}

pub(crate) fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// A rule parsed from a previously generated artifact, used only to exclude
/// already-covered patterns from a new run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingRule {
    pub name: String,
    pub patterns: Vec<String>,
}

/// One literal string inside a generated rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleString {
    pub value: String,
    pub score: f64,
    pub modifiers: Vec<String>,
}

impl RuleString {
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            score,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }
}

/// Document counts backing a generated rule, carried into rule metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceCounts {
    pub adversarial: usize,
    pub benign: usize,
}

/// A fully selected rule ready for serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratedRule {
    /// Syntax-legal identifier, unique within the run.
    pub name: String,
    pub tags: Vec<String>,
    /// Fixed date stamp from configuration; never wall-clock time.
    pub date: Option<String>,
    pub score: f64,
    pub strings: Vec<RuleString>,
    pub source_counts: SourceCounts,
}

impl GeneratedRule {
    /// Literal pattern texts of this rule, in order.
    pub fn pattern_values(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.value.as_str())
    }
}

/// Per-stage accounting for one generation run.
///
/// Stage counts are cumulative filters: `candidates >=
/// passed_frequency_floor >= passed_score_threshold >= passed_exclusion >=
/// selected >= rules_emitted`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub adversarial_documents: usize,
    pub benign_documents: usize,
    pub skipped_documents: usize,
    /// Distinct n-grams observed across both corpora.
    pub distinct_ngrams: usize,
    /// Distinct n-grams observed in at least one adversarial document.
    pub candidates: usize,
    pub passed_frequency_floor: usize,
    pub passed_score_threshold: usize,
    pub passed_exclusion: usize,
    /// Accepted after overlap suppression and the rule cap.
    pub selected: usize,
    pub rules_emitted: usize,
    pub serialization_failures: usize,
}

impl RunSummary {
    pub fn has_rules(&self) -> bool {
        self.rules_emitted > 0
    }

    /// Why the run produced no rules, if it produced none.
    pub fn empty_reason(&self) -> Option<&'static str> {
        if self.rules_emitted > 0 {
            return None;
        }
        Some(if self.adversarial_documents == 0 {
            "no adversarial documents were processed"
        } else if self.candidates == 0 {
            "no n-gram candidates were extracted"
        } else if self.passed_frequency_floor == 0 {
            "no candidate met the document-frequency floor"
        } else if self.passed_score_threshold == 0 {
            "no candidate met the score threshold"
        } else if self.passed_exclusion == 0 {
            "all qualifying candidates already exist in the supplied rules"
        } else if self.selected == 0 {
            "the rule cap excluded every qualifying candidate"
        } else {
            "every selected candidate failed serialization"
        })
    }

    /// Emits the summary through the standard diagnostics channel.
    pub fn log(&self) {
        info!(
            "processed {} adversarial and {} benign documents ({} skipped)",
            self.adversarial_documents, self.benign_documents, self.skipped_documents
        );
        info!(
            "observed {} distinct n-grams, {} adversarial candidates",
            self.distinct_ngrams, self.candidates
        );
        info!(
            "filters: {} past frequency floor, {} past score threshold, {} past exclusion",
            self.passed_frequency_floor, self.passed_score_threshold, self.passed_exclusion
        );
        info!(
            "selected {} candidates, emitted {} rules ({} serialization failures)",
            self.selected, self.rules_emitted, self.serialization_failures
        );
        if let Some(reason) = self.empty_reason() {
            warn!("no rules generated: {reason}");
        }
    }
}

/// Result of one engine run: the rules plus the accounting behind them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub rules: Vec<GeneratedRule>,
    pub summary: RunSummary,
}

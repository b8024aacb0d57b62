//! Post-generation coverage audit.
//!
//! Answers the operator question "how much of the adversarial corpus do
//! the emitted rules actually hit?" by scanning the corpus a second time
//! with a literal automaton over every emitted pattern. The audit is
//! optional and lives outside the engine: generation itself discards
//! documents after aggregation.

use crate::engine::tokenizer::Tokenizer;
use crate::engine::SampleStream;
use crate::types::{ratio, GeneratedRule};
use aho_corasick::AhoCorasick;
use tracing::warn;

/// Multi-pattern matcher over the emitted rule strings.
///
/// Documents are normalized with the same tokenizer the run used, so a
/// pattern matches exactly when the run's aggregation would have counted
/// the document for it.
pub struct CoverageAuditor {
    automaton: Option<AhoCorasick>,
    pattern_count: usize,
    tokenizer: Tokenizer,
}

impl CoverageAuditor {
    pub fn from_rules(rules: &[GeneratedRule], tokenizer: Tokenizer) -> Self {
        let patterns: Vec<&str> = rules.iter().flat_map(|r| r.pattern_values()).collect();
        let pattern_count = patterns.len();
        let automaton = if patterns.is_empty() {
            None
        } else {
            match AhoCorasick::new(&patterns) {
                Ok(ac) => Some(ac),
                Err(err) => {
                    warn!("coverage automaton unavailable: {err}");
                    None
                }
            }
        };
        Self {
            automaton,
            pattern_count,
            tokenizer,
        }
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Whether any emitted pattern occurs in the document.
    pub fn covers(&self, text: &str) -> bool {
        match &self.automaton {
            Some(automaton) => {
                let normalized = self.tokenizer.normalize(text);
                automaton.is_match(normalized.as_str())
            }
            None => false,
        }
    }

    /// Scan a sample stream and tally covered documents.
    pub fn audit(&self, stream: SampleStream<'_>) -> CoverageReport {
        let mut report = CoverageReport::default();
        for record in stream {
            match record {
                Ok(sample) => {
                    report.total += 1;
                    if self.covers(&sample.text) {
                        report.covered += 1;
                    }
                }
                Err(_) => report.skipped += 1,
            }
        }
        report
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageReport {
    pub covered: usize,
    pub total: usize,
    pub skipped: usize,
}

impl CoverageReport {
    pub fn fraction(&self) -> f64 {
        ratio(self.covered, self.total)
    }
}

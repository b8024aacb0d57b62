//! Candidate selection: floors, exclusion, ordering, overlap suppression,
//! and the rule cap.
//!
//! Selection is where determinism is enforced. Candidates arrive in
//! unspecified hash-map order; a strict total order (score descending, then
//! token length descending, then n-gram text) makes every downstream
//! decision, including overlap suppression, independent of input order.

use crate::config::NgramConfig;
use crate::types::{Candidate, ExistingRule};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Patterns already covered by previously generated rules, keyed by exact
/// post-normalization text.
#[derive(Debug, Clone, Default)]
pub struct ExclusionIndex {
    patterns: HashSet<String>,
}

impl ExclusionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: &[ExistingRule]) -> Self {
        let mut index = Self::new();
        for rule in rules {
            for pattern in &rule.patterns {
                index.insert(pattern.clone());
            }
        }
        index
    }

    pub fn insert(&mut self, pattern: impl Into<String>) {
        self.patterns.insert(pattern.into());
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Selection result with per-stage survivor counts for the run summary.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Accepted candidates in emission order.
    pub accepted: Vec<Candidate>,
    pub passed_frequency_floor: usize,
    pub passed_score_threshold: usize,
    pub passed_exclusion: usize,
}

/// Applies the selection contract to scored candidates.
#[derive(Debug)]
pub struct Selector<'a> {
    config: &'a NgramConfig,
    exclusions: &'a ExclusionIndex,
}

impl<'a> Selector<'a> {
    pub fn new(config: &'a NgramConfig, exclusions: &'a ExclusionIndex) -> Self {
        Self { config, exclusions }
    }

    /// Filter, order, suppress overlaps, and cap.
    ///
    /// Stages run in a fixed sequence: the document-frequency floor, the
    /// score floor (both floors keep boundary-equal values), the
    /// existing-pattern exclusion, then the ordered walk. During the walk a
    /// candidate is rejected when its text is a contiguous substring of an
    /// already-accepted pattern or contains one; a shorter accepted pattern
    /// already matches every document its superstring would, so neither
    /// direction adds signal. The walk stops once `max_rules_per_run`
    /// candidates are accepted.
    pub fn select(&self, mut candidates: Vec<Candidate>) -> Selection {
        candidates.retain(|c| c.adv_frequency() >= self.config.min_document_frequency);
        let passed_frequency_floor = candidates.len();

        candidates.retain(|c| c.score >= self.config.score_threshold);
        let passed_score_threshold = candidates.len();

        candidates.retain(|c| !self.exclusions.contains(&c.ngram));
        let passed_exclusion = candidates.len();

        candidates.sort_unstable_by(compare);

        let cap = self.config.max_rules_per_run;
        let mut accepted: Vec<Candidate> = Vec::with_capacity(cap.min(candidates.len()));
        for candidate in candidates {
            if accepted.len() >= cap {
                break;
            }
            if accepted
                .iter()
                .any(|kept| overlaps(&kept.ngram, &candidate.ngram))
            {
                continue;
            }
            accepted.push(candidate);
        }

        Selection {
            accepted,
            passed_frequency_floor,
            passed_score_threshold,
            passed_exclusion,
        }
    }
}

/// Total order over candidates: score descending, token length descending,
/// then n-gram text. Strict for distinct n-grams, so the accepted sequence
/// never depends on arrival order.
fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.length.cmp(&a.length))
        .then_with(|| a.ngram.cmp(&b.ngram))
}

/// Mutual containment check between an accepted pattern and a candidate.
fn overlaps(kept: &str, candidate: &str) -> bool {
    kept.contains(candidate) || candidate.contains(kept)
}

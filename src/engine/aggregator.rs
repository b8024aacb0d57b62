//! Cross-corpus document-frequency aggregation.
//!
//! The accumulator is an explicit value with a commutative, associative
//! [`merge`](FrequencyAccumulator::merge): shards of documents can be folded
//! into local accumulators in any order, on any number of workers, and the
//! reduced result is identical to a sequential pass. That property is what
//! keeps the whole run deterministic under parallel aggregation.

use crate::config::AggregationConfig;
use crate::engine::ngrams;
use crate::engine::tokenizer::Tokenizer;
use crate::types::{Label, TextSample};
use rayon::prelude::*;
use std::collections::HashMap;

/// Per-ngram document counters. Each side records in how many distinct
/// documents of that corpus the n-gram appeared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocCounts {
    pub adversarial: usize,
    pub benign: usize,
}

/// Document-frequency statistics over both corpora.
#[derive(Debug, Clone, Default)]
pub struct FrequencyAccumulator {
    counts: HashMap<String, DocCounts>,
    adv_doc_total: usize,
    benign_doc_total: usize,
}

impl FrequencyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one document's distinct n-grams.
    ///
    /// The document counts toward its corpus total even when it yields no
    /// n-grams at all; frequencies are fractions of documents processed,
    /// not of documents that produced patterns.
    pub fn observe(&mut self, label: Label, ngrams: impl IntoIterator<Item = String>) {
        match label {
            Label::Adversarial => self.adv_doc_total += 1,
            Label::Benign => self.benign_doc_total += 1,
        }
        for gram in ngrams {
            let entry = self.counts.entry(gram).or_default();
            match label {
                Label::Adversarial => entry.adversarial += 1,
                Label::Benign => entry.benign += 1,
            }
        }
    }

    /// Fold another accumulator into this one.
    ///
    /// Commutative and associative: `a.merge(b)` and `b.merge(a)` describe
    /// the same statistics regardless of how documents were sharded.
    pub fn merge(&mut self, other: Self) {
        self.adv_doc_total += other.adv_doc_total;
        self.benign_doc_total += other.benign_doc_total;
        for (gram, counts) in other.counts {
            let entry = self.counts.entry(gram).or_default();
            entry.adversarial += counts.adversarial;
            entry.benign += counts.benign;
        }
    }

    /// Drop n-grams seen in fewer adversarial documents than `min_adv_docs`.
    ///
    /// Memory relief for very large corpora. Selection applies its own
    /// frequency floor, so correctness never depends on calling this.
    pub fn prune_below(&mut self, min_adv_docs: usize) {
        self.counts.retain(|_, c| c.adversarial >= min_adv_docs);
    }

    pub fn adv_doc_total(&self) -> usize {
        self.adv_doc_total
    }

    pub fn benign_doc_total(&self) -> usize {
        self.benign_doc_total
    }

    /// Distinct n-grams observed across both corpora.
    pub fn distinct_ngrams(&self) -> usize {
        self.counts.len()
    }

    /// Distinct n-grams observed in at least one adversarial document.
    pub fn candidate_count(&self) -> usize {
        self.counts.values().filter(|c| c.adversarial > 0).count()
    }

    pub fn get(&self, ngram: &str) -> Option<DocCounts> {
        self.counts.get(ngram).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DocCounts)> {
        self.counts.iter().map(|(gram, counts)| (gram.as_str(), *counts))
    }
}

/// Builds a [`FrequencyAccumulator`] from materialized samples, sharding
/// across the rayon pool when the corpus is large enough to justify it.
#[derive(Debug, Clone)]
pub struct CorpusAggregator {
    tokenizer: Tokenizer,
    min_ngram: usize,
    max_ngram: usize,
    config: AggregationConfig,
}

impl CorpusAggregator {
    pub fn new(
        tokenizer: Tokenizer,
        min_ngram: usize,
        max_ngram: usize,
        config: AggregationConfig,
    ) -> Self {
        Self {
            tokenizer,
            min_ngram,
            max_ngram,
            config,
        }
    }

    /// Aggregate document frequencies for every sample.
    pub fn aggregate(&self, samples: &[TextSample]) -> FrequencyAccumulator {
        if self.config.parallel && samples.len() >= self.config.min_documents_for_parallelism {
            samples
                .par_chunks(self.config.shard_size.max(1))
                .map(|shard| self.fold_shard(shard))
                .reduce(FrequencyAccumulator::new, |mut acc, other| {
                    acc.merge(other);
                    acc
                })
        } else {
            self.fold_shard(samples)
        }
    }

    fn fold_shard(&self, shard: &[TextSample]) -> FrequencyAccumulator {
        let mut acc = FrequencyAccumulator::new();
        for sample in shard {
            let tokens = self.tokenizer.tokenize(&sample.text);
            let grams = ngrams::distinct_ngrams(&tokens, self.min_ngram, self.max_ngram);
            acc.observe(sample.label, grams);
        }
        acc
    }
}

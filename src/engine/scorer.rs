//! Differential scoring of aggregated n-grams.

use crate::engine::aggregator::FrequencyAccumulator;
use crate::types::{ratio, Candidate};

/// Differential score for one n-gram's document counts.
///
/// `adv_freq - benign_penalty_weight * benign_freq`, where each frequency
/// is the fraction of that corpus's documents containing the n-gram. An
/// empty corpus contributes a frequency of zero rather than a division
/// error. Scores land in `[-benign_penalty_weight, 1.0]`; a weight of zero
/// disables benign filtering entirely.
pub fn score(
    adv_count: usize,
    adv_total: usize,
    benign_count: usize,
    benign_total: usize,
    benign_penalty_weight: f64,
) -> f64 {
    ratio(adv_count, adv_total) - benign_penalty_weight * ratio(benign_count, benign_total)
}

/// Materialize scored candidates from aggregated statistics.
///
/// Only n-grams observed in at least one adversarial document become
/// candidates. Benign-only n-grams have an adversarial frequency of zero,
/// so they could never pass the selection frequency floor; skipping them
/// here keeps the candidate set proportional to the adversarial corpus.
///
/// The returned order is unspecified; selection imposes the total order.
pub fn scored_candidates(
    accumulator: &FrequencyAccumulator,
    benign_penalty_weight: f64,
) -> Vec<Candidate> {
    let adv_total = accumulator.adv_doc_total();
    let benign_total = accumulator.benign_doc_total();

    accumulator
        .iter()
        .filter(|(_, counts)| counts.adversarial > 0)
        .map(|(gram, counts)| Candidate {
            ngram: gram.to_string(),
            length: gram.split(' ').count(),
            adv_doc_count: counts.adversarial,
            benign_doc_count: counts.benign,
            adv_doc_total: adv_total,
            benign_doc_total: benign_total,
            score: score(
                counts.adversarial,
                adv_total,
                counts.benign,
                benign_total,
                benign_penalty_weight,
            ),
        })
        .collect()
}

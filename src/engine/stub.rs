//! Placeholder engine for pipeline wiring tests.

use crate::config::GeneratorConfig;
use crate::engine::selector::ExclusionIndex;
use crate::engine::{RuleExtractor, SampleStream};
use crate::error::Result;
use crate::types::{Extraction, GeneratedRule, RuleString, RunSummary, SourceCounts};
use tracing::info;

/// Consumes its inputs and returns one fixed rule, so adapters, the
/// writer, and the CLI can be exercised without the statistical engine.
pub struct StubEngine {
    config: GeneratorConfig,
}

impl StubEngine {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }
}

impl RuleExtractor for StubEngine {
    fn extract(
        &self,
        adversarial: SampleStream<'_>,
        benign: SampleStream<'_>,
        _existing: &ExclusionIndex,
    ) -> Result<Extraction> {
        let mut adversarial_documents = 0;
        let mut benign_documents = 0;
        let mut skipped = 0;

        for record in adversarial {
            match record {
                Ok(_) => adversarial_documents += 1,
                Err(_) => skipped += 1,
            }
        }
        for record in benign {
            match record {
                Ok(_) => benign_documents += 1,
                Err(_) => skipped += 1,
            }
        }
        info!(
            "stub engine consumed {adversarial_documents} adversarial and {benign_documents} benign documents ({skipped} skipped)"
        );

        let rule = GeneratedRule {
            name: "stub_rule_001".to_string(),
            tags: self.config.output.tags.clone(),
            date: self.config.output.rule_date.clone(),
            score: 1.0,
            strings: vec![RuleString::new("stub placeholder pattern", 1.0)],
            source_counts: SourceCounts {
                adversarial: adversarial_documents,
                benign: benign_documents,
            },
        };

        let summary = RunSummary {
            adversarial_documents,
            benign_documents,
            skipped_documents: skipped,
            selected: 1,
            ..Default::default()
        };

        Ok(Extraction {
            rules: vec![rule],
            summary,
        })
    }
}

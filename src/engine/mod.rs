//! Extraction engines and the seam between them and the rest of the
//! pipeline.
//!
//! An engine consumes two labeled sample streams exactly once and returns
//! generated rules plus run accounting. Engines never learn which adapter
//! produced a stream, and adapters never learn which engine consumes it.

pub mod aggregator;
pub mod ngram;
pub mod ngrams;
pub mod scorer;
pub mod selector;
pub mod stub;
pub mod tokenizer;

use crate::config::GeneratorConfig;
use crate::error::{GenError, Result};
use crate::types::{Extraction, TextSample};

pub use selector::ExclusionIndex;
pub use tokenizer::Tokenizer;

/// Fallible stream of labeled samples from an ingestion adapter.
///
/// `Err` items are per-record failures (undecodable lines, missing
/// fields); engines skip and count them. Source-level failures surface
/// before a stream exists.
pub type SampleStream<'a> = Box<dyn Iterator<Item = Result<TextSample>> + Send + 'a>;

/// A rule extraction strategy.
pub trait RuleExtractor {
    /// Consume both corpora and produce rules.
    ///
    /// `existing` holds patterns from previously generated artifacts;
    /// candidates matching one exactly are excluded before selection.
    fn extract(
        &self,
        adversarial: SampleStream<'_>,
        benign: SampleStream<'_>,
        existing: &ExclusionIndex,
    ) -> Result<Extraction>;
}

/// Available extraction engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Differential n-gram analysis, the production engine.
    Ngram,
    /// Fixed placeholder output for pipeline wiring tests.
    Stub,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Ngram => "ngram",
            EngineKind::Stub => "stub",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EngineKind {
    type Err = GenError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ngram" => Ok(EngineKind::Ngram),
            "stub" => Ok(EngineKind::Stub),
            other => Err(GenError::ConfigError(format!(
                "unknown engine {other:?} (expected ngram or stub)"
            ))),
        }
    }
}

/// Instantiate the engine for `kind` with a validated configuration.
pub fn create_engine(kind: EngineKind, config: GeneratorConfig) -> Result<Box<dyn RuleExtractor>> {
    config.validate()?;
    Ok(match kind {
        EngineKind::Ngram => Box::new(ngram::NgramEngine::new(config)?),
        EngineKind::Stub => Box::new(stub::StubEngine::new(config)),
    })
}

//! Unified configuration for corpus processing and rule generation.
//!
//! This module provides typed, validated control over every stage of a
//! generation run: tokenization, n-gram extraction, differential scoring,
//! selection, and rule serialization. Configuration can be built in code,
//! loaded from a YAML file, or a combination of both (the CLI overlays
//! flags on top of a loaded file).

use crate::error::{GenError, Result};
use serde::Deserialize;
use std::path::Path;

/// Tokenizer behavior applied identically to both corpora.
///
/// Normalization is part of the statistical contract: adversarial and
/// benign documents must pass through the same transform or the
/// differential frequencies are meaningless.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenizerConfig {
    /// Fold text to lowercase before tokenizing.
    ///
    /// When enabled, generated rule strings carry the `nocase` modifier so
    /// the emitted rules match with the same insensitivity.
    ///
    /// **Default**: true
    pub lowercase: bool,

    /// Treat punctuation as token boundaries, keeping only alphanumeric
    /// runs (underscores included).
    ///
    /// When disabled, tokens are split on whitespace alone and keep any
    /// attached punctuation.
    ///
    /// **Default**: true
    pub strip_punctuation: bool,

    /// Minimum character length for a token to survive normalization.
    ///
    /// **Default**: 2 (single characters are noise for phrase detection)
    pub min_token_chars: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
            min_token_chars: 2,
        }
    }
}

/// N-gram extraction, scoring, and selection parameters.
///
/// # Examples
///
/// ```rust
/// use yara_gen::config::NgramConfig;
///
/// let config = NgramConfig::default();
/// assert_eq!(config.min_ngram, 3);
/// assert_eq!(config.max_ngram, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NgramConfig {
    /// Shortest n-gram to extract, in tokens.
    ///
    /// **Default**: 3
    pub min_ngram: usize,

    /// Longest n-gram to extract, in tokens. Must be >= `min_ngram`.
    ///
    /// **Default**: 10
    pub max_ngram: usize,

    /// Minimum fraction of adversarial documents an n-gram must appear in
    /// before it can become a rule. Range `[0.0, 1.0]`.
    ///
    /// **Default**: 0.01
    pub min_document_frequency: f64,

    /// Minimum differential score for selection.
    ///
    /// The score is `adv_frequency - benign_penalty_weight *
    /// benign_frequency`, so with the default weight a threshold of `0.8`
    /// demands patterns that are common in adversarial text and nearly
    /// absent from benign text.
    ///
    /// **Default**: 0.8
    pub score_threshold: f64,

    /// Weight applied to benign document frequency when scoring. `0.0`
    /// disables benign filtering entirely. Must be >= 0.
    ///
    /// **Default**: 1.0
    pub benign_penalty_weight: f64,

    /// Hard cap on rules emitted per run. `0` produces a valid empty
    /// artifact.
    ///
    /// **Default**: 50
    pub max_rules_per_run: usize,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            min_ngram: 3,
            max_ngram: 10,
            min_document_frequency: 0.01,
            score_threshold: 0.8,
            benign_penalty_weight: 1.0,
            max_rules_per_run: 50,
        }
    }
}

impl NgramConfig {
    /// Validate parameter ranges, failing before any document is read.
    pub fn validate(&self) -> Result<()> {
        if self.min_ngram < 1 {
            return Err(GenError::ConfigError(
                "min_ngram must be at least 1".to_string(),
            ));
        }
        if self.max_ngram < self.min_ngram {
            return Err(GenError::ConfigError(format!(
                "max_ngram ({}) must be >= min_ngram ({})",
                self.max_ngram, self.min_ngram
            )));
        }
        if !(0.0..=1.0).contains(&self.min_document_frequency) {
            return Err(GenError::ConfigError(format!(
                "min_document_frequency must be within [0.0, 1.0], got {}",
                self.min_document_frequency
            )));
        }
        if !self.score_threshold.is_finite() {
            return Err(GenError::ConfigError(
                "score_threshold must be a finite number".to_string(),
            ));
        }
        if !self.benign_penalty_weight.is_finite() || self.benign_penalty_weight < 0.0 {
            return Err(GenError::ConfigError(format!(
                "benign_penalty_weight must be >= 0, got {}",
                self.benign_penalty_weight
            )));
        }
        Ok(())
    }
}

/// Rule artifact parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Fixed date stamp written into rule metadata. Wall-clock time is
    /// never used; leaving this unset omits the `date` meta line and keeps
    /// repeated runs byte-identical.
    ///
    /// **Default**: unset
    pub rule_date: Option<String>,

    /// Tags attached to every generated rule. Serialized sorted and
    /// de-duplicated.
    ///
    /// **Default**: empty
    pub tags: Vec<String>,
}

/// Parallel aggregation tuning.
///
/// Aggregation is a fold/reduce over document shards; these knobs only
/// affect wall-clock time, never results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationConfig {
    /// Process document shards on the rayon thread pool.
    ///
    /// **Default**: true
    pub parallel: bool,

    /// Corpus size below which aggregation stays sequential even when
    /// `parallel` is enabled.
    ///
    /// **Default**: 256
    pub min_documents_for_parallelism: usize,

    /// Documents per worker shard.
    ///
    /// **Default**: 128
    pub shard_size: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_documents_for_parallelism: 256,
            shard_size: 128,
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shard_size < 1 {
            return Err(GenError::ConfigError(
                "shard_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete configuration for one generation run.
///
/// # Examples
///
/// ```rust
/// use yara_gen::config::GeneratorConfig;
///
/// // Production default: strict thresholds.
/// let config = GeneratorConfig::default();
/// assert_eq!(config.ngram.score_threshold, 0.8);
///
/// // Exploratory runs: admit weaker signals.
/// let config = GeneratorConfig::loose();
/// assert_eq!(config.ngram.score_threshold, 0.5);
///
/// // Fine tuning via builders.
/// let config = GeneratorConfig::default()
///     .with_ngram_range(2, 6)
///     .with_max_rules(10)
///     .with_tag("llm");
/// assert_eq!(config.ngram.max_ngram, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub ngram: NgramConfig,
    pub tokenizer: TokenizerConfig,
    pub output: OutputConfig,
    pub aggregation: AggregationConfig,
}

impl GeneratorConfig {
    /// Strict preset: the default thresholds.
    ///
    /// High score floor, suitable for rules deployed without review.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Loose preset: lowered score floor for exploratory runs where a
    /// human reviews the output.
    pub fn loose() -> Self {
        Self {
            ngram: NgramConfig {
                score_threshold: 0.5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Load configuration from a YAML file.
    ///
    /// Unknown keys are rejected so typos fail the run instead of being
    /// silently ignored.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GenError::ConfigError(format!(
                "cannot read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config: Self = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section, failing before any document is read.
    pub fn validate(&self) -> Result<()> {
        self.ngram.validate()?;
        self.aggregation.validate()?;
        if self.tokenizer.min_token_chars < 1 {
            return Err(GenError::ConfigError(
                "min_token_chars must be at least 1".to_string(),
            ));
        }
        for tag in &self.output.tags {
            if !crate::yara::escape::is_legal_identifier(tag) {
                return Err(GenError::ConfigError(format!(
                    "tag {tag:?} is not a legal rule tag"
                )));
            }
        }
        Ok(())
    }

    // Builder methods for n-gram parameters

    /// Set the n-gram token length range.
    pub fn with_ngram_range(mut self, min: usize, max: usize) -> Self {
        self.ngram.min_ngram = min;
        self.ngram.max_ngram = max;
        self
    }

    /// Set the minimum differential score for selection.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.ngram.score_threshold = threshold;
        self
    }

    /// Set the minimum adversarial document frequency.
    pub fn with_min_document_frequency(mut self, frequency: f64) -> Self {
        self.ngram.min_document_frequency = frequency;
        self
    }

    /// Set the benign frequency penalty weight.
    pub fn with_benign_penalty_weight(mut self, weight: f64) -> Self {
        self.ngram.benign_penalty_weight = weight;
        self
    }

    /// Set the per-run rule cap.
    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.ngram.max_rules_per_run = max_rules;
        self
    }

    // Builder methods for output metadata

    /// Set the fixed date stamp for rule metadata.
    pub fn with_rule_date(mut self, date: impl Into<String>) -> Self {
        self.output.rule_date = Some(date.into());
        self
    }

    /// Append a tag attached to every generated rule.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.output.tags.push(tag.into());
        self
    }

    // Builder methods for tokenization

    /// Enable or disable lowercase folding.
    pub fn with_lowercase(mut self, enable: bool) -> Self {
        self.tokenizer.lowercase = enable;
        self
    }

    /// Enable or disable punctuation stripping.
    pub fn with_strip_punctuation(mut self, enable: bool) -> Self {
        self.tokenizer.strip_punctuation = enable;
        self
    }

    // Builder methods for aggregation

    /// Enable or disable parallel aggregation.
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.aggregation.parallel = enable;
        self
    }

    /// Set the documents-per-shard size for parallel aggregation.
    pub fn with_shard_size(mut self, size: usize) -> Self {
        self.aggregation.shard_size = size;
        self
    }
}

//! Text normalization shared by both corpora.
//!
//! Differential frequencies are only meaningful when adversarial and benign
//! documents pass through the exact same transform, so normalization lives
//! in one place and is applied identically everywhere text enters the
//! pipeline (aggregation, coverage auditing, exclusion matching).

use crate::config::TokenizerConfig;

/// Deterministic tokenizer: case folding, punctuation handling, minimum
/// token length, whitespace collapse.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Split text into normalized tokens.
    ///
    /// With punctuation stripping enabled (the default), tokens are maximal
    /// runs of alphanumeric characters or underscores; anything else is a
    /// boundary. Tokens shorter than the configured minimum are dropped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let folded;
        let text = if self.config.lowercase {
            folded = text.to_lowercase();
            folded.as_str()
        } else {
            text
        };

        let mut tokens = Vec::new();
        if self.config.strip_punctuation {
            let mut current = String::new();
            for ch in text.chars() {
                if ch.is_alphanumeric() || ch == '_' {
                    current.push(ch);
                } else if !current.is_empty() {
                    self.push_token(&mut tokens, std::mem::take(&mut current));
                }
            }
            if !current.is_empty() {
                self.push_token(&mut tokens, current);
            }
        } else {
            for word in text.split_whitespace() {
                self.push_token(&mut tokens, word.to_string());
            }
        }
        tokens
    }

    /// Normalized form of a text: tokens rejoined with single spaces.
    ///
    /// This is the representation n-grams, exclusion patterns, and the
    /// coverage audit all operate on.
    pub fn normalize(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }

    pub fn lowercases(&self) -> bool {
        self.config.lowercase
    }

    fn push_token(&self, tokens: &mut Vec<String>, token: String) {
        if token.chars().count() >= self.config.min_token_chars {
            tokens.push(token);
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

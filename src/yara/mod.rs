//! YARA rule serialization and artifact parsing.
//!
//! [`writer`] renders selected rules into deterministic rule-file text,
//! [`escape`] owns string escaping and identifier derivation, and
//! [`existing`] reads previous artifacts back in for exclusion.

pub mod escape;
pub mod existing;
pub mod writer;

pub use escape::{escape_string, is_legal_identifier, rule_identifier, unescape_string};
pub use existing::{parse_file, parse_rules};
pub use writer::{render, write_file, RenderedArtifact, GENERATOR_NAME};

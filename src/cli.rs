//! CLI argument parsing for yara-gen

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::adapters::AdapterKind;
use crate::engine::EngineKind;

/// Dataset source format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AdapterArg {
    /// One JSON object per line (default)
    Jsonl,
    /// Delimited tabular file with a header row
    Csv,
    /// Plain text, one sample per line
    Text,
    /// Markup dump; tags stripped, blank-line blocks become samples
    Markup,
    /// Line-delimited JSON stream, `-` for standard input
    Stream,
}

impl From<AdapterArg> for AdapterKind {
    fn from(arg: AdapterArg) -> Self {
        match arg {
            AdapterArg::Jsonl => AdapterKind::Jsonl,
            AdapterArg::Csv => AdapterKind::Csv,
            AdapterArg::Text => AdapterKind::Text,
            AdapterArg::Markup => AdapterKind::Markup,
            AdapterArg::Stream => AdapterKind::Stream,
        }
    }
}

/// Rule extraction engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// Differential n-gram scoring (default)
    Ngram,
    /// Fixed placeholder output for wiring tests
    Stub,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Ngram => EngineKind::Ngram,
            EngineArg::Stub => EngineKind::Stub,
        }
    }
}

/// Tuning preset applied before individual flag overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// High threshold, fewer and stronger rules
    Strict,
    /// Low threshold, broader net
    Loose,
}

#[derive(Parser, Debug)]
#[command(name = "yara-gen")]
#[command(version)]
#[command(about = "Generate YARA detection rules from labeled text corpora", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate rules from an adversarial corpus and an optional benign corpus
    Generate(GenerateArgs),
    /// Normalize a dataset into the canonical JSONL sample format
    Prepare(PrepareArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Adversarial corpus path
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Benign corpus path
    #[arg(short, long, value_name = "PATH")]
    pub benign: Option<PathBuf>,

    /// Adversarial corpus format
    #[arg(long, value_enum, default_value = "jsonl")]
    pub adapter: AdapterArg,

    /// Benign corpus format (defaults to --adapter)
    #[arg(long, value_enum)]
    pub benign_adapter: Option<AdapterArg>,

    /// Existing YARA rules whose patterns are excluded from the output
    #[arg(long, value_name = "FILE")]
    pub existing_rules: Option<PathBuf>,

    /// Output rule file
    #[arg(short, long, value_name = "FILE", default_value = "generated_rules.yar")]
    pub output: PathBuf,

    /// Rule extraction engine
    #[arg(long, value_enum, default_value = "ngram")]
    pub engine: EngineArg,

    /// Tuning preset applied before individual overrides
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Minimum differential score for a candidate
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Shortest n-gram length in tokens
    #[arg(long, value_name = "N")]
    pub min_ngram: Option<usize>,

    /// Longest n-gram length in tokens
    #[arg(long, value_name = "N")]
    pub max_ngram: Option<usize>,

    /// Minimum adversarial document frequency (fraction of documents)
    #[arg(long, value_name = "FRACTION")]
    pub min_df: Option<f64>,

    /// Cap on emitted rules
    #[arg(long, value_name = "N")]
    pub max_rules: Option<usize>,

    /// Weight of the benign frequency penalty
    #[arg(long, value_name = "WEIGHT")]
    pub benign_weight: Option<f64>,

    /// Date stamped into rule metadata (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub rule_date: Option<String>,

    /// Tag attached to every rule (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Record field holding the sample text (jsonl, csv, stream)
    #[arg(long, value_name = "COLUMN")]
    pub text_column: Option<String>,

    /// Stop reading each corpus after this many samples
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Write the run summary to this file as JSON
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// Re-scan the adversarial corpus and report rule coverage
    #[arg(long)]
    pub coverage: bool,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Dataset to normalize
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Dataset format
    #[arg(long, value_enum, default_value = "jsonl")]
    pub adapter: AdapterArg,

    /// Output JSONL file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Record field holding the sample text (jsonl, csv, stream)
    #[arg(long, value_name = "COLUMN")]
    pub text_column: Option<String>,

    /// Stop after this many samples
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

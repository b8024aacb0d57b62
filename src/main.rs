use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use yara_gen::adapters::{create_adapter, AdapterKind, DatasetAdapter};
use yara_gen::cli::{Cli, Command, GenerateArgs, ModeArg, PrepareArgs};
use yara_gen::coverage::CoverageAuditor;
use yara_gen::engine::{create_engine, ExclusionIndex, SampleStream, Tokenizer};
use yara_gen::types::{GeneratedRule, Label};
use yara_gen::yara::{existing, writer};
use yara_gen::GeneratorConfig;

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise verbosity maps to info, debug,
/// trace.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Generate(args) => run_generate(cli.config.as_deref(), &args),
        Command::Prepare(args) => run_prepare(&args),
    }
}

/// Layer configuration: defaults, then config file, then mode preset,
/// then individual flags.
fn resolve_config(config_path: Option<&Path>, args: &GenerateArgs) -> Result<GeneratorConfig> {
    let mut config = match config_path {
        Some(path) => GeneratorConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(mode) = args.mode {
        let preset = match mode {
            ModeArg::Strict => GeneratorConfig::strict(),
            ModeArg::Loose => GeneratorConfig::loose(),
        };
        config.ngram.score_threshold = preset.ngram.score_threshold;
    }

    if let Some(threshold) = args.threshold {
        config.ngram.score_threshold = threshold;
    }
    if let Some(n) = args.min_ngram {
        config.ngram.min_ngram = n;
    }
    if let Some(n) = args.max_ngram {
        config.ngram.max_ngram = n;
    }
    if let Some(fraction) = args.min_df {
        config.ngram.min_document_frequency = fraction;
    }
    if let Some(cap) = args.max_rules {
        config.ngram.max_rules_per_run = cap;
    }
    if let Some(weight) = args.benign_weight {
        config.ngram.benign_penalty_weight = weight;
    }
    if let Some(date) = &args.rule_date {
        config.output.rule_date = Some(date.clone());
    }
    if !args.tags.is_empty() {
        config.output.tags = args.tags.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Open a corpus stream, applying the sample limit if one was given.
fn open_stream<'a>(
    adapter: &'a dyn DatasetAdapter,
    path: &Path,
    limit: Option<usize>,
) -> Result<SampleStream<'a>> {
    let stream = adapter.load(path)?;
    Ok(match limit {
        Some(n) => Box::new(stream.take(n)),
        None => stream,
    })
}

fn load_exclusions(path: Option<&Path>) -> Result<ExclusionIndex> {
    let path = match path {
        Some(path) => path,
        None => return Ok(ExclusionIndex::new()),
    };
    if !path.exists() {
        warn!(
            path = %path.display(),
            "existing-rules file not found, continuing without exclusions"
        );
        return Ok(ExclusionIndex::new());
    }
    let rules = existing::parse_file(path)?;
    let index = ExclusionIndex::from_rules(&rules);
    info!(
        rules = rules.len(),
        patterns = index.len(),
        "loaded existing rules for exclusion"
    );
    Ok(index)
}

fn run_generate(config_path: Option<&Path>, args: &GenerateArgs) -> Result<()> {
    let config = resolve_config(config_path, args)?;
    let engine = create_engine(args.engine.into(), config.clone())?;
    let exclusions = load_exclusions(args.existing_rules.as_deref())?;

    let adversarial_kind: AdapterKind = args.adapter.into();
    let benign_kind: AdapterKind = args
        .benign_adapter
        .map(Into::into)
        .unwrap_or(adversarial_kind);
    let text_column = args.text_column.as_deref();
    let adversarial_adapter = create_adapter(adversarial_kind, Label::Adversarial, text_column);
    let benign_adapter = create_adapter(benign_kind, Label::Benign, text_column);

    let adversarial = open_stream(adversarial_adapter.as_ref(), &args.input, args.limit)
        .with_context(|| format!("opening adversarial corpus {}", args.input.display()))?;
    let benign: SampleStream<'_> = match &args.benign {
        Some(path) => open_stream(benign_adapter.as_ref(), path, args.limit)
            .with_context(|| format!("opening benign corpus {}", path.display()))?,
        None => Box::new(std::iter::empty()),
    };

    let extraction = engine.extract(adversarial, benign, &exclusions)?;

    let artifact = writer::write_file(&args.output, &extraction.rules)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        rules = artifact.rules_emitted,
        "wrote rule file"
    );

    let mut summary = extraction.summary;
    summary.rules_emitted = artifact.rules_emitted;
    summary.serialization_failures = artifact.failures;
    summary.log();

    if let Some(path) = &args.summary_json {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing summary {}", path.display()))?;
    }

    if args.coverage {
        report_coverage(
            &config,
            &extraction.rules,
            adversarial_adapter.as_ref(),
            &args.input,
            args.limit,
        )?;
    }

    Ok(())
}

/// Re-scan the adversarial corpus and print how many samples at least
/// one emitted rule matches.
fn report_coverage(
    config: &GeneratorConfig,
    rules: &[GeneratedRule],
    adapter: &dyn DatasetAdapter,
    input: &Path,
    limit: Option<usize>,
) -> Result<()> {
    let auditor = CoverageAuditor::from_rules(rules, Tokenizer::new(config.tokenizer.clone()));
    let stream = open_stream(adapter, input, limit)
        .with_context(|| format!("re-opening {} for coverage audit", input.display()))?;
    let report = auditor.audit(stream);
    println!(
        "coverage: {}/{} adversarial samples matched ({:.1}%)",
        report.covered,
        report.total,
        report.fraction() * 100.0
    );
    Ok(())
}

fn run_prepare(args: &PrepareArgs) -> Result<()> {
    // Corpus role is assigned at generate time, not here.
    let adapter = create_adapter(
        args.adapter.into(),
        Label::Adversarial,
        args.text_column.as_deref(),
    );
    let stream = open_stream(adapter.as_ref(), &args.input, args.limit)
        .with_context(|| format!("opening {}", args.input.display()))?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut out = BufWriter::new(file);

    let mut written = 0usize;
    let mut skipped = 0usize;
    for item in stream {
        match item {
            Ok(sample) => {
                let record = serde_json::json!({
                    "text": sample.text,
                    "source": sample.source,
                });
                writeln!(out, "{record}")?;
                written += 1;
            }
            Err(err) => {
                debug!("skipping record: {err}");
                skipped += 1;
            }
        }
    }
    out.flush()?;
    info!(
        written,
        skipped,
        path = %args.output.display(),
        "prepared corpus"
    );
    Ok(())
}

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, ensure, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fxlens_config::{load_config, AppConfig, LogFormat};
use fxlens_core::{CurrencyPair, PriceSeries};
use fxlens_data::{self as data, DateRange};
use fxlens_indicators::{classify, compare, summarize, IndicatorEngine, IndicatorSeries};
use fxlens_narrative::{tidy_completion, AnalysisKind, NarrativeRequest};
use tracing::{debug, info, warn};

use crate::report::{render_comparison, AnalysisReport};
use crate::telemetry::init_tracing;

#[derive(Parser)]
#[command(name = "fxlens", version, about = "Technical analysis of daily exchange rates")]
pub struct Cli {
    /// Configuration layer loaded on top of default.toml
    #[arg(long, default_value = "default", global = true)]
    env: String,
    /// Directory holding the configuration files
    #[arg(long, default_value = "config", global = true)]
    config_dir: PathBuf,
    /// Log filter directive (overrides RUST_LOG and the configured level)
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Log output format (pretty or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the currency pairs present in a rate file
    Pairs {
        /// Rate file (defaults to data.input from the configuration)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Compute indicators, summary statistics and signals for one pair
    Analyze(AnalyzeArgs),
    /// Compare several pairs side by side
    Compare(CompareArgs),
    /// Print the completion prompt (or SQL) for one pair
    Prompt(PromptArgs),
    /// Print the effective configuration as TOML
    Config,
    /// Clean up a completion text for display
    Tidy {
        /// File holding the completion (reads stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Rate file (defaults to data.input from the configuration)
    #[arg(long)]
    input: Option<PathBuf>,
    /// First date included (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last date included (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Pair to analyze (defaults to analysis.default_pair)
    #[arg(long)]
    pair: Option<CurrencyPair>,
    /// Number of trailing indicator rows to print
    #[arg(long)]
    tail: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Pair to include; repeat for each pair
    #[arg(long = "pair", required = true)]
    pairs: Vec<CurrencyPair>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args)]
pub struct PromptArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long)]
    pair: Option<CurrencyPair>,
    /// market-trend, technical-analysis or risk-assessment
    #[arg(long)]
    kind: Option<AnalysisKind>,
    /// Completion model (defaults to narrative.model)
    #[arg(long)]
    model: Option<String>,
    /// Print the warehouse SQL statement instead of the bare prompt
    #[arg(long)]
    sql: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.env, &cli.config_dir)?;
    init_tracing(
        cli.log_level.as_deref(),
        &config.log.level,
        cli.log_format.unwrap_or(config.log.format),
    )?;
    debug!(env = %cli.env, dir = %cli.config_dir.display(), "configuration loaded");

    match cli.command {
        Commands::Pairs { input } => list_pairs(&config, input),
        Commands::Analyze(args) => analyze(&config, args),
        Commands::Compare(args) => compare_pairs(&config, args),
        Commands::Prompt(args) => prompt(&config, args),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Commands::Tidy { input } => tidy(input),
    }
}

fn list_pairs(config: &AppConfig, input: Option<PathBuf>) -> Result<()> {
    let path = resolve_input(config, input)?;
    let pairs = data::available_pairs(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if pairs.is_empty() {
        info!(path = %path.display(), "file carries no pair columns");
    }
    for pair in pairs {
        println!("{pair}");
    }
    Ok(())
}

fn analyze(config: &AppConfig, args: AnalyzeArgs) -> Result<()> {
    let pair = args
        .pair
        .unwrap_or_else(|| config.analysis.default_pair.clone());
    let tail = args.tail.unwrap_or(config.analysis.tail_rows);
    let indicators = load_indicators(config, &args.source, &pair)?;
    let summary = summarize(&indicators)
        .with_context(|| format!("no observations for {pair} in the selected range"))?;
    let signals = indicators.latest().map(classify).unwrap_or_default();
    let report = AnalysisReport {
        pair: &pair,
        summary: &summary,
        signals: &signals,
        rows: indicators.tail(tail),
    };
    match args.format {
        OutputFormat::Table => print!("{}", report.to_table()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn compare_pairs(config: &AppConfig, args: CompareArgs) -> Result<()> {
    ensure!(args.pairs.len() >= 2, "compare needs at least two --pair arguments");
    let path = resolve_input(config, args.source.input.clone())?;
    let range = resolve_range(config, &args.source)?;
    let loaded = data::load_many(&path, &args.pairs, &range)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if loaded.len() < args.pairs.len().min(data::MAX_COMPARED_PAIRS) {
        warn!(
            requested = args.pairs.len(),
            loaded = loaded.len(),
            "some pairs had no data and were left out"
        );
    }
    let engine = IndicatorEngine::new();
    let inputs: Vec<(CurrencyPair, IndicatorSeries)> = loaded
        .into_iter()
        .map(|(pair, series)| {
            let indicators = engine.compute(&series);
            (pair, indicators)
        })
        .collect();
    let comparison = compare(&inputs);
    match args.format {
        OutputFormat::Table => print!("{}", render_comparison(&comparison)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
    }
    Ok(())
}

fn prompt(config: &AppConfig, args: PromptArgs) -> Result<()> {
    let pair = args
        .pair
        .unwrap_or_else(|| config.analysis.default_pair.clone());
    let kind = args.kind.unwrap_or(config.narrative.kind);
    let model = args.model.unwrap_or_else(|| config.narrative.model.clone());
    if !config.narrative.is_known_model(&model) {
        bail!(
            "unknown model '{model}' (configured models: {})",
            config.narrative.models.join(", ")
        );
    }

    let indicators = load_indicators(config, &args.source, &pair)?;
    let summary = summarize(&indicators)
        .with_context(|| format!("no observations for {pair} in the selected range"))?;
    let latest = indicators
        .latest()
        .context("indicator series unexpectedly empty")?;
    let signals = classify(latest);
    let request = NarrativeRequest::build(kind, &pair, model, &summary, latest, &signals);
    info!(%pair, %kind, model = %request.model, "built narrative request");

    if args.sql {
        println!("{}", request.to_sql());
    } else {
        print!("{}", request.prompt);
    }
    Ok(())
}

fn tidy(input: Option<PathBuf>) -> Result<()> {
    let text = match input {
        Some(path) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    println!("{}", tidy_completion(&text));
    Ok(())
}

fn load_indicators(
    config: &AppConfig,
    source: &SourceArgs,
    pair: &CurrencyPair,
) -> Result<IndicatorSeries> {
    let path = resolve_input(config, source.input.clone())?;
    let range = resolve_range(config, source)?;
    let series: PriceSeries = data::load_series(&path, Some(pair), &range)
        .with_context(|| format!("failed to load {pair} from {}", path.display()))?;
    Ok(IndicatorEngine::new().compute(&series))
}

fn resolve_input(config: &AppConfig, input: Option<PathBuf>) -> Result<PathBuf> {
    input
        .or_else(|| config.data.input.clone())
        .context("no rate file given; pass --input or set data.input")
}

/// Without a start date, an end date selects the trailing lookback window and
/// no dates at all selects the whole file.
fn resolve_range(config: &AppConfig, source: &SourceArgs) -> Result<DateRange> {
    let range = match (source.start, source.end) {
        (None, Some(end)) => DateRange::trailing(end, config.data.lookback_days),
        (start, end) => DateRange::new(start, end)?,
    };
    Ok(range)
}

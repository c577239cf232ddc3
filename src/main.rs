use analytics::PerformanceEngine;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{load_config, Lookback};
use futures::future::join_all;
use indicators::IndicatorEngine;
use price_feed::{CsvPriceFeed, FetchOutcome, PriceFeed};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod analysis;
mod render;

use analysis::{Analyzer, TickerReport};

/// The main entry point for the Stockscope analysis tool.
#[tokio::main]
async fn main() -> Result<()> {
    // Load RUST_LOG and STOCKSCOPE__* overrides from a .env file, if present.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Descriptive technical and performance analytics for daily price histories.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators and risk/return metrics for one or more tickers.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Tickers to analyse (e.g. "RELIANCE", "AAPL"). Market suffixes are tried automatically.
    #[arg(required = true)]
    tickers: Vec<String>,

    /// Path to a TOML configuration file. Defaults to ./stockscope.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the <SYMBOL>.csv history files. Overrides the configuration.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// How much history to analyse, counted back from the latest bar.
    #[arg(long, value_enum)]
    period: Option<Lookback>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Number of bins in the daily-return histogram.
    #[arg(long, default_value_t = 20)]
    bins: usize,

    /// Include the full SMA overlay series in JSON output.
    #[arg(long)]
    overlays: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of one analysis request.
async fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(data_dir) = args.data_dir {
        config.feed.data_dir = data_dir;
    }
    let lookback = args.period.unwrap_or(config.feed.lookback);

    let analyzer = Analyzer::new(
        IndicatorEngine::new(config.indicators.clone())
            .context("Invalid indicator configuration")?,
        PerformanceEngine::new(config.performance.clone())
            .context("Invalid performance configuration")?,
        args.bins,
        args.overlays,
    );
    let feed = CsvPriceFeed::from_config(&config.feed);

    tracing::info!(
        tickers = ?args.tickers,
        data_dir = %feed.data_dir().display(),
        %lookback,
        "Starting analysis"
    );

    let reports = fetch_and_analyze(&feed, &analyzer, &args.tickers, lookback).await;

    let mut found = Vec::new();
    for (ticker, result) in args.tickers.iter().zip(reports) {
        match result {
            Ok(Some(report)) => found.push(report),
            Ok(None) => eprintln!("Could not retrieve data for {}", ticker),
            Err(e) => eprintln!("Error analysing {}: {:#}", ticker, e),
        }
    }

    if found.is_empty() {
        anyhow::bail!("No price history found for any of the requested tickers");
    }

    match args.format {
        OutputFormat::Table => {
            for report in &found {
                println!("{}", render::render_tables(report));
            }
        }
        OutputFormat::Json => {
            println!("{}", render::render_json(&found)?);
        }
    }

    Ok(())
}

/// Fetches every ticker concurrently and runs the engines on each series found.
///
/// `Ok(None)` marks a ticker the feed could not resolve; the engines are not run for it.
async fn fetch_and_analyze(
    feed: &dyn PriceFeed,
    analyzer: &Analyzer,
    tickers: &[String],
    lookback: Lookback,
) -> Vec<Result<Option<TickerReport>>> {
    let fetches = tickers.iter().map(|ticker| feed.fetch(ticker, lookback));
    let outcomes = join_all(fetches).await;

    outcomes
        .into_iter()
        .zip(tickers)
        .map(|(outcome, ticker)| -> Result<Option<TickerReport>> {
            let outcome =
                outcome.with_context(|| format!("Failed to fetch price history for {}", ticker))?;
            Ok(match outcome {
                FetchOutcome::Found { symbol, series } => Some(analyzer.analyze(&symbol, &series)),
                FetchOutcome::NotFound { .. } => None,
            })
        })
        .collect()
}

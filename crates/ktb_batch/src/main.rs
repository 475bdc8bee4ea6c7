//! Key Tenor Bucketing CLI
//!
//! # Commands
//!
//! - `ktb run` - Bucket the latest blotter and write the daily chart
//! - `ktb check` - Validate configuration and show the resolved inputs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ktb_batch::prelude::*;
use ktb_core::Date;
use ktb_inputs::prelude::TradeSource;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Forward-starting DV01 by key tenor bucket
#[derive(Parser)]
#[command(name = "ktb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the key tenor batch
    Run {
        /// Evaluation date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<String>,

        /// Blotter file, overriding the snapshot directory
        #[arg(long)]
        blotter: Option<PathBuf>,

        /// Market data fixture CSV
        #[arg(long)]
        market_data: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Validate configuration and list the resolved blotter
    Check,
}

fn apply_cli_overrides(config: &mut KtbConfig, command: &Commands) {
    if let Commands::Run {
        blotter,
        market_data,
        output_dir,
        ..
    } = command
    {
        if let Some(path) = blotter {
            config.paths.blotter = Some(path.clone());
        }
        if let Some(path) = market_data {
            config.market_data.fixture = Some(path.clone());
        }
        if let Some(path) = output_dir {
            config.paths.output_dir = path.clone();
        }
    }
}

fn init_tracing(config: &KtbConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

async fn run(config: &KtbConfig, as_of: Option<&str>) -> Result<()> {
    let as_of = match as_of {
        Some(text) => Date::parse(text).with_context(|| format!("invalid --as-of '{text}'"))?,
        None => Date::today(),
    };

    let workflow = KeyTenorWorkflow::new(as_of);
    let progress: ProgressCallback = Arc::new(|step, pct| {
        tracing::debug!(step = step.name(), pct, "Progress");
    });
    let outcome = workflow.execute(config, Some(progress)).await?;

    let counts = outcome.run.counts();
    println!("Key tenor bucketing as of {as_of}");
    println!("  blotter:  {}", outcome.blotter.display());
    println!(
        "  trades:   {} read, {} filtered out, {} skipped, {} bucketed",
        counts.records, counts.rejected, counts.skipped, counts.priced
    );
    for skipped in &outcome.run.skipped {
        println!("  skipped:  {} ({})", skipped.trade_id, skipped.error);
    }
    for (request, error) in &outcome.failures {
        println!("  lookup:   {} {} ({})", request.ticker, request.field, error);
    }
    for path in &outcome.report_paths {
        println!("  wrote:    {}", path.display());
    }
    Ok(())
}

fn check(config: &KtbConfig) -> Result<()> {
    let blotter = KeyTenorWorkflow::blotter(config)?;
    println!("Configuration OK");
    println!("  blotter:      {}", blotter.describe());
    match &config.market_data.fixture {
        Some(path) if path.exists() => println!("  market data:  {}", path.display()),
        Some(path) => println!("  market data:  {} (missing)", path.display()),
        None => println!("  market data:  not configured"),
    }
    println!("  output dir:   {}", config.paths.output_dir.display());
    println!("  base ccy:     {}", config.fx.base_currency);
    for warning in config.warnings() {
        println!("  warning:      {}", warning);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = KtbConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .with_env_override();
    apply_cli_overrides(&mut config, &cli.command);

    init_tracing(&config, cli.verbose);
    config.validate()?;

    match &cli.command {
        Commands::Run { as_of, .. } => run(&config, as_of.as_deref()).await,
        Commands::Check => check(&config),
    }
}

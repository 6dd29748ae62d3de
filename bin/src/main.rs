//! Tasador CLI binary.
//!
//! Provides a command-line interface for per-ticker equity valuation.

mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, process};
use tasador::{ServiceConfig, TasadorError, ValuationService, fmp::FmpClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasador")]
#[command(about = "Equity valuation metrics and affordability scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file (thresholds, aliases, cache TTL)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a ticker against every valuation metric
    Valuation {
        /// Ticker symbol (case-insensitive)
        ticker: String,
    },

    /// Show headline figures for discounted cash flow inputs
    Snapshot {
        /// Ticker symbol (case-insensitive)
        ticker: String,
    },

    /// List the valuation metrics and their threshold bands
    Metrics {
        /// Filter by basis (trailing or forward)
        #[arg(short, long)]
        basis: Option<String>,

        /// Show descriptions and bands
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show the ten-year treasury yield
    Treasury,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Response payload as JSON
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        let not_found = e
            .downcast_ref::<TasadorError>()
            .is_some_and(TasadorError::is_not_found);
        process::exit(if not_found { 2 } else { 1 });
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,reqwest=warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = ServiceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Valuation { ticker } => {
            let service = service(config)?;
            cmd::valuation::show_valuation(&service, &ticker, cli.format).await?;
        }
        Commands::Snapshot { ticker } => {
            let service = service(config)?;
            cmd::snapshot::show_snapshot(&service, &ticker, cli.format).await?;
        }
        Commands::Metrics { basis, detailed } => {
            cmd::metrics::list_metrics(&config, basis.as_deref(), detailed, cli.format)?;
        }
        Commands::Treasury => {
            let service = service(config)?;
            cmd::treasury::show_treasury(&service, cli.format).await?;
        }
    }

    Ok(())
}

fn service(config: ServiceConfig) -> Result<ValuationService<FmpClient>> {
    let client = FmpClient::from_env().map_err(TasadorError::from)?;
    Ok(ValuationService::new(client, config))
}

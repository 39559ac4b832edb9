//! Tendril main entry point
//!
//! This is the command-line interface for the Tendril domain-scoped crawler.

use clap::Parser;
use std::path::PathBuf;
use tendril::config::{resolve_config, DisplayLevel, Overrides, RedundancyLevel};
use tendril::crawler::run_crawl;
use tendril::ConfigError;
use tracing_subscriber::EnvFilter;

/// Tendril: a depth-bounded, domain-scoped link crawler
///
/// Tendril maps the link tree under one or more seed URLs, staying inside
/// each seed's domain, collecting email and phone contacts along the way,
/// and writing a per-job log tree of everything it saw.
#[derive(Parser, Debug)]
#[command(name = "tendril")]
#[command(version = "1.0.0")]
#[command(about = "A depth-bounded, domain-scoped link crawler", long_about = None)]
struct Cli {
    /// Seed URLs to crawl (override any seeds in the config file)
    #[arg(value_name = "SEEDS")]
    seeds: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Depth ceiling for the traversal
    #[arg(short, long, value_name = "N")]
    depth: Option<u32>,

    /// Do not collect email and phone contacts
    #[arg(long)]
    no_scrape: bool,

    /// Do not persist URL/email/phone logs to disk
    #[arg(long)]
    no_save: bool,

    /// Relog policy: 0 = unique, 1 = standard, 2 = redundant
    #[arg(short, long, value_name = "LEVEL")]
    redundancy: Option<u8>,

    /// Display level: 0 = quiet, 1 = standard, 2 = verbose
    #[arg(long, value_name = "LEVEL")]
    display: Option<u8>,

    /// Directory the per-job log tree is created under
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Per-fetch timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let overrides = build_overrides(&cli)?;

    let config = match resolve_config(cli.config.as_deref(), overrides) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to resolve configuration: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Starting crawl job: {} seed(s), depth {}",
        config.seeds.len(),
        config.total_depth
    );

    match run_crawl(&config).await {
        Ok(stats) => {
            stats.print();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl job failed: {}", e);
            Err(e.into())
        }
    }
}

/// Maps CLI flags onto configuration overrides
fn build_overrides(cli: &Cli) -> Result<Overrides, ConfigError> {
    let redundancy = cli
        .redundancy
        .map(RedundancyLevel::try_from)
        .transpose()
        .map_err(ConfigError::Validation)?;

    let display = cli
        .display
        .map(DisplayLevel::try_from)
        .transpose()
        .map_err(ConfigError::Validation)?;

    Ok(Overrides {
        seeds: cli.seeds.clone(),
        total_depth: cli.depth,
        scrape_contacts: cli.no_scrape.then_some(false),
        persist_logs: cli.no_save.then_some(false),
        redundancy,
        display,
        log_dir: cli.log_dir.clone(),
        timeout_secs: cli.timeout,
    })
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tendril=info,warn"),
            1 => EnvFilter::new("tendril=debug,info"),
            2 => EnvFilter::new("tendril=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

//! Page-Tally main entry point
//!
//! This is the command-line interface for the Page-Tally substring counter.

use anyhow::Context;
use clap::Parser;
use page_tally::config::{load_config_with_hash, validate, Config};
use page_tally::crawler::run_scan;
use page_tally::output::ConsoleReporter;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

/// Page-Tally: count a substring across many web pages
///
/// Reads one URL per line, fetches every page concurrently, prints the
/// number of matches per page and the overall total.
#[derive(Parser, Debug)]
#[command(name = "page-tally")]
#[command(version)]
#[command(about = "Count a substring across many web pages", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Read URLs from this file instead of standard input
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Substring to count (case-sensitive)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Input buffer size between the reader and the dispatcher
    #[arg(long, value_name = "N")]
    buffer: Option<usize>,

    /// Maximum number of fetches in flight
    #[arg(long, value_name = "N")]
    max_workers: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(pattern) = &self.pattern {
            config.search.pattern = pattern.clone();
        }
        if let Some(timeout) = self.timeout {
            config.fetcher.request_timeout_secs = timeout;
        }
        if let Some(buffer) = self.buffer {
            config.dispatcher.input_capacity = buffer;
        }
        if self.max_workers.is_some() {
            config.dispatcher.max_workers = self.max_workers;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(&cli)?;

    tracing::info!(
        "Counting {:?} with a {}s timeout, input buffer {}, max workers {}",
        config.search.pattern,
        config.fetcher.request_timeout_secs,
        config.dispatcher.input_capacity,
        config
            .dispatcher
            .max_workers
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
    );

    let reporter = Arc::new(ConsoleReporter);

    match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            run_scan(&config, BufReader::new(file), reporter).await?;
        }
        None => {
            run_scan(&config, BufReader::new(tokio::io::stdin()), reporter).await?;
        }
    }

    Ok(())
}

/// Loads the config file if one was given, then applies CLI overrides
fn load_configuration(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid command-line override")?;

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only count and total lines.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_tally=info,warn"),
            1 => EnvFilter::new("page_tally=debug,info"),
            2 => EnvFilter::new("page_tally=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

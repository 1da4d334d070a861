//! Sumi-Crawl main entry point
//!
//! This is the command-line interface for the Sumi-Crawl site crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_crawl::config::{load_config_with_hash, validate, Config};
use sumi_crawl::crawler::crawl;
use sumi_crawl::output::{print_statistics, JsonFileOutput, OutputHandler};
use tracing_subscriber::EnvFilter;

/// Sumi-Crawl: A bounded, polite site crawler
///
/// Sumi-Crawl walks every page of a single host reachable from the seed URL
/// within a path-depth limit, and writes the set of crawled URLs as JSON.
#[derive(Parser, Debug)]
#[command(name = "sumi-crawl")]
#[command(version)]
#[command(about = "A bounded, polite site crawler", long_about = None)]
struct Cli {
    /// Seed URL; its host bounds the crawl
    #[arg(long, value_name = "URL")]
    url: String,

    /// Maximum path depth to crawl [default: 3]
    #[arg(long)]
    max_depth: Option<usize>,

    /// Minimum delay between requests in milliseconds [default: 100]
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Number of concurrent workers [default: 10]
    #[arg(long)]
    workers: Option<usize>,

    /// Path of the JSON result file [default: output.json]
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Optional TOML configuration file; explicit flags take precedence
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    tracing::info!(
        "Crawling {} (max depth {}, {} workers, {}ms between requests)",
        cli.url,
        config.crawler.max_depth,
        config.crawler.worker_pool_size,
        config.crawler.request_delay_ms
    );

    let output_path = config.output.path.clone();
    let report = match crawl(config, &cli.url).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let output = report.output();
    if let Err(e) = JsonFileOutput::new(&output_path).write(&output) {
        tracing::error!("Failed to save results: {}", e);
        std::process::exit(1);
    }

    println!(
        "{}",
        output
            .to_json_pretty()
            .context("failed to render crawl result")?
    );

    if !cli.quiet {
        print_statistics(&report.statistics);
    }

    Ok(())
}

/// Loads the config file if one was given and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(delay) = cli.delay {
        config.crawler.request_delay_ms = delay;
    }
    if let Some(workers) = cli.workers {
        config.crawler.worker_pool_size = workers;
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the JSON result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_crawl=info,warn"),
            1 => EnvFilter::new("sumi_crawl=debug,info"),
            2 => EnvFilter::new("sumi_crawl=trace,debug"),
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

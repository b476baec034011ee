//! Kaleido main entry point
//!
//! This is the command-line interface for the Kaleido diversity crawler.

use anyhow::Context;
use clap::Parser;
use kaleido_crawl::config::{load_config_with_hash, Config, LoggingConfig};
use kaleido_crawl::crawler::Coordinator;
use kaleido_crawl::seeds::load_seeds;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Name of the crawl log file inside the log directory
const LOG_FILE_NAME: &str = "kaleido-crawl.log";

/// Kaleido: a politeness-aware, diversity-maximizing web crawler
///
/// Kaleido samples pages starting from a list of seeds, steering towards
/// languages, countries and domains it has not seen much of yet, while
/// respecting robots.txt, content types and per-domain caps.
#[derive(Parser, Debug)]
#[command(name = "kaleido-crawl")]
#[command(version)]
#[command(about = "A politeness-aware, diversity-maximizing web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Seed file to use instead of the configured one
    #[arg(long, value_name = "FILE")]
    seeds: Option<PathBuf>,

    /// Validate config and show the seeds without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    if let Some(seeds) = &cli.seeds {
        config.seeds.file_path = seeds.display().to_string();
    }

    setup_logging(cli.verbose, cli.quiet, &config.logging);
    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    let seeds = load_seeds(&config.seeds).context("Failed to load seeds")?;

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
        return Ok(());
    }

    handle_crawl(config, seeds).await
}

/// Sets up the tracing subscriber: stderr plus an append-only log file
///
/// `-q` only quiets stderr. The log file keeps at least info so the crawl
/// summary always reaches it.
fn setup_logging(verbose: u8, quiet: bool, logging: &LoggingConfig) {
    let stderr_filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        verbosity_filter(verbose)
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(stderr_filter);

    let (file_layer, file_error) = match open_log_file(Path::new(&logging.log_directory)) {
        Ok(file) => (
            Some(
                fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .with_filter(verbosity_filter(verbose)),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(
            "Logging to stderr only, cannot open log file in {}: {}",
            logging.log_directory,
            e
        );
    }
}

fn verbosity_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("kaleido_crawl=info,warn"),
        1 => EnvFilter::new("kaleido_crawl=debug,info"),
        2 => EnvFilter::new("kaleido_crawl=trace,debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn open_log_file(directory: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(directory)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(directory.join(LOG_FILE_NAME))
}

/// Handles the --dry-run mode: shows the effective configuration and seeds
fn handle_dry_run(config: &Config, seeds: &[String]) {
    println!("=== Kaleido Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max seeds: {}", config.crawler.max_seeds);
    println!("  Max pages to sample: {}", config.crawler.max_pages_to_sample);
    println!("  Max pages per seed: {}", config.crawler.max_pages_per_seed);
    println!(
        "  Max pages per domain: {}",
        config.crawler.max_pages_per_domain
    );
    println!(
        "  Max requests per second: {}",
        config.crawler.max_requests_per_second
    );
    println!(
        "  Max children per page: {}",
        config.crawler.max_children_per_page
    );
    println!(
        "  Seed time budget: {}s",
        config.crawler.seed_time_budget_secs
    );

    println!("\nFilters:");
    println!(
        "  Content types: {}",
        config.filter.supported_content_types.join(", ")
    );
    println!(
        "  Sensitive suffixes: {}",
        config.filter.sensitive_suffixes.join(", ")
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Download root: {}", config.output.download_root);
    println!(
        "  Files per folder: {}",
        config.output.max_files_per_folder
    );
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }
    println!("  Log directory: {}", config.logging.log_directory);

    let crawled = seeds.len().min(config.crawler.max_seeds);
    println!("\nSeeds ({} loaded, {} crawled):", seeds.len(), crawled);
    for seed in seeds.iter().take(crawled) {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// Ctrl-C or SIGTERM stops the crawl; the summary is emitted either way.
async fn handle_crawl(config: Config, seeds: Vec<String>) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config, seeds).context("Failed to start crawl")?;

    let outcome = tokio::select! {
        result = coordinator.run() => Some(result),
        _ = shutdown_signal() => None,
    };

    coordinator.finalize();

    match outcome {
        Some(Ok(())) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Some(Err(e)) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
        None => {
            tracing::warn!("Interrupted, crawl stopped");
            Ok(())
        }
    }
}

/// Resolves on Ctrl-C, or on SIGTERM where signals exist
///
/// The SIGTERM handler is installed when this is called, not when first polled.
fn shutdown_signal() -> impl std::future::Future<Output = ()> {
    #[cfg(unix)]
    let terminate = {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(stream) => Some(stream),
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                None
            }
        }
    };

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match terminate {
                Some(mut stream) => {
                    stream.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate => {}
        }
    }
}

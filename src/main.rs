//! Indo-Harvest main entry point
//!
//! This is the command-line interface for the Indo-Harvest report generator.

use anyhow::Context;
use clap::Parser;
use indo_harvest::config::{load_config_with_hash, Config};
use indo_harvest::fetch::{listen_for_interrupts, shutdown_channel};
use indo_harvest::harvest::Harvester;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Indo-Harvest: scrape Indonesian school, government and news sites
///
/// Runs the school, government and news workflows in order, retrying failed
/// targets with backoff, and writes JSON, CSV and HTML reports per category.
#[derive(Parser, Debug)]
#[command(name = "indo-harvest")]
#[command(version)]
#[command(about = "Scrape Indonesian websites into category reports", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in target lists when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory for the generated reports (overrides the config)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show the targets without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration given, using built-in target lists");
            Config::default()
        }
    };

    if let Some(dir) = cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("indo_harvest=info,warn"),
            1 => EnvFilter::new("indo_harvest=debug,info"),
            2 => EnvFilter::new("indo_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &Config) {
    println!("=== Indo-Harvest Dry Run ===\n");

    println!("Scraper:");
    println!("  Delay between requests: {}ms", config.scraper.delay_ms);
    println!("  Timeout: {}s", config.scraper.timeout_secs);
    println!("  Retry base delay: {}ms", config.retry.base_delay_ms);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Flush partial results: {}", config.output.flush_partial);

    for workflow in &config.workflow {
        println!(
            "\n{} ({} targets, max {} attempts{}):",
            workflow.category.heading(),
            workflow.targets.len(),
            workflow.max_attempts,
            workflow
                .max_pages
                .map(|p| format!(", {} pages", p))
                .unwrap_or_default()
        );
        for target in &workflow.targets {
            println!("  - {}", target);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest run
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    println!("INDO HARVEST");
    println!("{}", "=".repeat(60));

    let (trigger, shutdown) = shutdown_channel();
    let harvester = Harvester::from_config(&config, shutdown)?;

    tokio::spawn(async move {
        // First Ctrl-C stops gracefully, a second one exits at once
        if listen_for_interrupts(trigger, tokio::signal::ctrl_c).await.is_ok() {
            eprintln!("\nForced exit");
            std::process::exit(130);
        }
    });

    let runs = harvester.run(&config.workflow).await;

    if harvester.is_shutting_down() || runs.iter().any(|run| run.interrupted) {
        println!("\nHarvest stopped by user");
        return Ok(());
    }

    println!("\n{}", "=".repeat(60));
    println!("✓ All workflows finished");
    println!("Reports written to: {}", config.output.directory);
    println!("{}", "=".repeat(60));

    Ok(())
}

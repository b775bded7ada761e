//! Civic-Scout main entry point
//!
//! This is the command-line interface for the Civic-Scout open-data
//! endpoint discovery pipeline.

use anyhow::Context;
use civic_scout::config::{load_config_with_hash, Config};
use civic_scout::pipeline::Pipeline;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Civic-Scout: an open-data portal endpoint scout
///
/// Civic-Scout crawls a municipal open-data portal starting from a seed
/// search or category URL, discovers dataset detail pages, and resolves
/// each one to its direct machine-readable resource URLs.
#[derive(Parser, Debug)]
#[command(name = "civic-scout")]
#[command(version = "1.0.0")]
#[command(about = "An open-data portal endpoint scout", long_about = None)]
struct Cli {
    /// Seed search/category URL to start discovery from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Query name used for the `<query>_data` output directory
    #[arg(short, long, default_value = "portal")]
    query: String,

    /// Override the configured output data directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short = 'Q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching
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
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if let Some(data_dir) = &cli.data_dir {
        config.output.data_dir = data_dir.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&cli, &config);
        return Ok(());
    }

    handle_run(config, &cli.seed, &cli.query).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("civic_scout=info,warn"),
            1 => EnvFilter::new("civic_scout=debug,info"),
            2 => EnvFilter::new("civic_scout=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the run plan
fn handle_dry_run(cli: &Cli, config: &Config) {
    println!("=== Civic-Scout Dry Run ===\n");

    println!("Seed URL: {}", cli.seed);
    println!("Query:    {}", cli.query);

    println!("\nFetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Connect timeout: {}s", config.fetch.connect_timeout_secs);
    println!("  Identity pool: {} entries", config.fetch.user_agents.len());

    println!("\nPipeline:");
    println!("  Max in-flight fetches: {}", config.pipeline.max_in_flight);

    println!("\nPortal:");
    println!("  Browse marker: {}", config.portal.browse_marker);
    println!("  Results container: .{}", config.portal.results_container);
    println!("  Result block: .{}", config.portal.result_block);
    println!("  View id attribute: {}", config.portal.view_id_attr);
    println!("  Detail link: .{}", config.portal.detail_link);
    println!("  Resource suffix: .{}", config.portal.resource_suffix);

    println!("\nOutput:");
    println!(
        "  Records: {}/{}_data/<view-id>.json",
        config.output.data_dir, cli.query
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main discovery run
async fn handle_run(config: Config, seed: &str, query: &str) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(config).context("Failed to initialize pipeline")?;

    // Ctrl-C cancels at the next per-entry fetch boundary; results
    // collected so far are still persisted
    let cancel = pipeline.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling discovery run");
            cancel.cancel();
        }
    });

    match pipeline.run(seed, query).await {
        Ok(report) => {
            tracing::info!("Discovery run completed");
            println!(
                "Resolved {} of {} datasets ({} categories) -> {}",
                report.endpoints_resolved,
                report.datasets_listed,
                report.categories_found,
                report.output_dir.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Discovery run failed: {}", e);
            Err(e.into())
        }
    }
}

//! kol-board main entry point
//!
//! This is the command-line interface for the KOL leaderboard service.

use anyhow::Context;
use clap::Parser;
use kol_board::config::{load_config_with_hash, Config};
use kol_board::service::{LeaderboardService, RefreshOutcome};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// kol-board: a cached, rate-limited KOL leaderboard API
///
/// Scrapes the upstream leaderboard page, caches the parsed ranking for a
/// short freshness window, and serves it as JSON with per-client rate limits.
#[derive(Parser, Debug)]
#[command(name = "kol-board")]
#[command(version = "1.0.0")]
#[command(about = "A cached, rate-limited KOL leaderboard API", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and print the effective settings without serving
    #[arg(long, conflicts_with = "once")]
    dry_run: bool,

    /// Fetch and parse the leaderboard once, print it as JSON, and exit
    #[arg(long, conflicts_with = "dry_run")]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.once {
        handle_once(&config).await?;
    } else {
        handle_serve(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kol_board=info,warn"),
            1 => EnvFilter::new("kol_board=debug,info"),
            2 => EnvFilter::new("kol_board=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== kol-board Dry Run ===\n");

    println!("Server:");
    println!("  Bind: {}", config.server.bind);

    println!("\nUpstream:");
    println!("  URL: {}", config.upstream.url);
    println!("  User agent: {}", config.upstream.user_agent);
    println!("  Timeout: {}s", config.upstream.timeout_secs);
    println!("  Connect timeout: {}s", config.upstream.connect_timeout_secs);

    println!("\nCache:");
    println!("  Freshness window: {}s", config.cache.freshness_secs);

    println!("\nRate limit:");
    println!(
        "  {} requests per {}s per client",
        config.rate_limit.max_requests, config.rate_limit.window_secs
    );
    println!("  Sweep interval: {}s", config.rate_limit.sweep_interval_secs);

    println!("\nMarkup:");
    println!("  Container prefix: {}", config.markup.container_class_prefix);
    println!("  Profit prefix: {}", config.markup.profit_class_prefix);
    println!("  PnL unit suffix: {}", config.markup.pnl_unit_suffix);
    println!("  Social domains: {}", config.markup.social_domains.join(", "));
    println!("  Social icon label: {}", config.markup.social_icon_label);

    println!("\n✓ Configuration is valid");
}

/// Handles the --once mode: one fetch + parse, JSON to stdout
async fn handle_once(config: &Config) -> anyhow::Result<()> {
    let service = LeaderboardService::from_config(config)?;

    match service.refresh().await {
        RefreshOutcome::Fresh(entries) => {
            tracing::info!("Fetched {} entries", entries.len());
            println!("{}", serde_json::to_string_pretty(entries.as_ref())?);
            Ok(())
        }
        RefreshOutcome::Failed(failure) => {
            tracing::error!("Refresh failed: {}", failure);
            Err(failure.into())
        }
    }
}

/// Handles the default mode: serve HTTP until shutdown
async fn handle_serve(config: &Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;

    tracing::info!(
        "Serving {} (freshness {}s, {} requests per {}s per client)",
        config.upstream.url,
        config.cache.freshness_secs,
        config.rate_limit.max_requests,
        config.rate_limit.window_secs
    );

    let service = Arc::new(LeaderboardService::from_config(config)?);

    match kol_board::server::serve(service, addr).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("Server failed: {}", e);
            Err(e.into())
        }
    }
}

//! kol-board: a cached, rate-limited KOL leaderboard endpoint
//!
//! This crate scrapes a third-party leaderboard page, turns its markup into
//! structured entries, and serves them over HTTP behind a freshness cache and
//! a per-client request limiter.

pub mod cache;
pub mod config;
pub mod entry;
pub mod limiter;
pub mod scrape;
pub mod server;
pub mod service;
pub mod url;

use thiserror::Error;

/// Main error type for kol-board operations
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for kol-board operations
pub type Result<T> = std::result::Result<T, BoardError>;

// Re-export commonly used types
pub use config::Config;
pub use entry::LeaderboardEntry;
pub use service::LeaderboardService;

//! Configuration module for kol-board
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults that
//! target the public kolscan leaderboard.
//!
//! # Example
//!
//! ```no_run
//! use kol_board::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kol-board.toml")).unwrap();
//! println!("Listening on {}", config.server.bind);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, Config, MarkupConfig, RateLimitConfig, ServerConfig, UpstreamConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

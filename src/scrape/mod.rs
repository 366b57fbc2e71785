//! Scrape module for retrieving and parsing the leaderboard page
//!
//! This module contains the upstream-facing half of the service:
//! - HTTP fetching of the page markup
//! - The [`MarkupSource`] seam used by the service
//! - Markup rules and the entry parser

mod fetcher;
mod parser;
mod rules;
mod source;

pub use fetcher::{build_http_client, fetch_markup, FetchError};
pub use parser::EntryParser;
pub use rules::MarkupRules;
pub use source::{HttpSource, MarkupSource};

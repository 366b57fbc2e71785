//! Markup source abstraction
//!
//! The service only needs "give me the current page"; this trait lets it be
//! driven by the real upstream or by an in-memory page.

use crate::config::UpstreamConfig;
use crate::scrape::fetcher::{build_http_client, fetch_markup, FetchError};
use async_trait::async_trait;
use reqwest::Client;

/// Something that can produce the raw leaderboard markup
#[async_trait]
pub trait MarkupSource: Send + Sync {
    /// Retrieves the current page markup
    async fn fetch(&self) -> Result<String, FetchError>;

    /// Human-readable location, used in logs
    fn describe(&self) -> String;
}

/// Fetches markup from the configured upstream URL over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl MarkupSource for HttpSource {
    async fn fetch(&self) -> Result<String, FetchError> {
        fetch_markup(&self.client, &self.url).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

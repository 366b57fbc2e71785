//! HTTP fetcher for the leaderboard page
//!
//! This module handles the single outbound request the service makes:
//! - Building an HTTP client that presents itself as a browser
//! - GET of the configured page with bounded timeouts
//! - Error classification
//!
//! No retries are attempted; a caller that wants another attempt issues
//! another request.

use crate::config::UpstreamConfig;
use reqwest::Client;
use thiserror::Error;

/// Reasons the leaderboard page could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status_code} from {url}")]
    Status { url: String, status_code: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    fn classify(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            FetchError::Timeout { url }
        } else if error.is_connect() {
            FetchError::Connect {
                url,
                message: error.to_string(),
            }
        } else {
            FetchError::Http { url, source: error }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use kol_board::config::UpstreamConfig;
/// use kol_board::scrape::build_http_client;
///
/// let client = build_http_client(&UpstreamConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UpstreamConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body as text
///
/// | Condition          | Result                 |
/// |--------------------|------------------------|
/// | 2xx                | `Ok(body)`             |
/// | Non-2xx status     | `FetchError::Status`   |
/// | Timeout            | `FetchError::Timeout`  |
/// | Connection refused | `FetchError::Connect`  |
/// | Anything else      | `FetchError::Http`     |
pub async fn fetch_markup(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::classify(url, e))
}

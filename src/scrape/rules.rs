//! Markup matching rules for the leaderboard page
//!
//! All knowledge of the upstream page structure lives here. When the page is
//! rebuilt with a different layout, only these rules need to change.

use crate::config::{MarkupConfig, UpstreamConfig};
use crate::url::origin_of;
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Compiled selectors and normalization rules used by [`EntryParser`](super::EntryParser)
#[derive(Debug, Clone)]
pub struct MarkupRules {
    /// One block per ranked user; matched by class prefix
    pub container: Selector,

    /// Profile link inside a container
    pub primary_link: Selector,

    /// Heading carrying the display name / numeric values
    pub heading: Selector,

    /// Avatar image
    pub avatar: Selector,

    /// Candidate social links
    pub link: Selector,

    /// Images with an accessible label
    pub labelled_image: Selector,

    /// Block holding realized PnL figures; matched by class prefix
    pub profit: Selector,

    /// Unit suffix stripped from the native PnL value
    pub pnl_unit_suffix: String,

    /// Characters removed from the USD value
    pub currency_chars: Vec<char>,

    /// Hosts identifying a social profile link (lowercase)
    pub social_domains: Vec<String>,

    /// Alt text identifying a social icon (lowercase)
    pub social_icon_label: String,

    /// Origin that root-relative image paths are resolved against
    pub origin: Url,
}

impl MarkupRules {
    /// Builds rules from configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the upstream URL does not parse or a class
    /// prefix does not produce a valid selector.
    pub fn from_config(markup: &MarkupConfig, upstream: &UpstreamConfig) -> Result<Self, ConfigError> {
        let page = Url::parse(&upstream.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid upstream url: {}", e)))?;

        Ok(Self {
            container: class_prefix_selector(&markup.container_class_prefix)?,
            primary_link: selector("a")?,
            heading: selector("h1")?,
            avatar: selector("img")?,
            link: selector("a[href]")?,
            labelled_image: selector("img[alt]")?,
            profit: class_prefix_selector(&markup.profit_class_prefix)?,
            pnl_unit_suffix: markup.pnl_unit_suffix.clone(),
            currency_chars: vec!['$', '(', ')'],
            social_domains: markup
                .social_domains
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            social_icon_label: markup.social_icon_label.trim().to_lowercase(),
            origin: origin_of(&page),
        })
    }

    /// Rules for the public kolscan leaderboard
    pub fn kolscan() -> Result<Self, ConfigError> {
        Self::from_config(&MarkupConfig::default(), &UpstreamConfig::default())
    }
}

fn selector(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css)
        .map_err(|e| ConfigError::Validation(format!("Invalid selector '{}': {:?}", css, e)))
}

/// Generated class names carry an unstable suffix, so match on substring
fn class_prefix_selector(prefix: &str) -> Result<Selector, ConfigError> {
    selector(&format!(r#"[class*="{}"]"#, prefix))
}

//! Leaderboard markup parser
//!
//! This module turns the raw leaderboard page into ranked entries:
//! - Locating user blocks by class prefix
//! - Extracting name, address, avatar and social link
//! - Normalizing the realized PnL figures
//!
//! A page with no matching blocks yields an empty list rather than an error;
//! the cache layer decides what to serve in that case.

use crate::entry::LeaderboardEntry;
use crate::scrape::rules::MarkupRules;
use crate::url::{absolutize, host_matches_any, last_path_segment};
use scraper::{ElementRef, Html};
use std::collections::HashMap;

/// Parses leaderboard markup using a set of [`MarkupRules`]
#[derive(Debug, Clone)]
pub struct EntryParser {
    rules: MarkupRules,
}

impl EntryParser {
    pub fn new(rules: MarkupRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &MarkupRules {
        &self.rules
    }

    /// Parses a full page into entries in document (rank) order
    ///
    /// # Extraction Rules
    ///
    /// For each container:
    /// 1. `name` is the first heading inside the first link
    /// 2. `address` is the last path segment of that link's target
    /// 3. `pfpUrl` is the first image source, made absolute
    /// 4. `twitterUrl` is a link to a social host, falling back to a link
    ///    wrapping the social icon image
    /// 5. PnL values come from the first two headings of the profit block
    ///
    /// Containers without a name or address are skipped. When an address
    /// repeats, the later entry replaces the earlier one in place.
    ///
    /// # Example
    ///
    /// ```
    /// use kol_board::scrape::{EntryParser, MarkupRules};
    ///
    /// let html = r#"<div class="leaderboard_leaderboardUser__x1">
    ///     <a href="/account/Abc"><h1>Alice</h1></a>
    ///     <div class="leaderboard_totalProfitNum__y2"><h1>12.5Sol</h1><h1>($1,234.56)</h1></div>
    /// </div>"#;
    /// let parser = EntryParser::new(MarkupRules::kolscan().unwrap());
    /// let entries = parser.parse(html);
    /// assert_eq!(entries[0].address, "Abc");
    /// assert_eq!(entries[0].realized_pnl, "12.5");
    /// assert_eq!(entries[0].realized_pnl_usd, "1,234.56");
    /// ```
    pub fn parse(&self, html: &str) -> Vec<LeaderboardEntry> {
        let document = Html::parse_document(html);

        let mut entries: Vec<LeaderboardEntry> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut skipped = 0usize;

        for container in document.select(&self.rules.container) {
            let Some(entry) = self.parse_container(container) else {
                skipped += 1;
                continue;
            };

            match positions.get(&entry.address) {
                Some(&index) => {
                    tracing::debug!("Duplicate address {}, keeping latest", entry.address);
                    entries[index] = entry;
                }
                None => {
                    positions.insert(entry.address.clone(), entries.len());
                    entries.push(entry);
                }
            }
        }

        tracing::debug!(
            "Parsed {} entries ({} containers skipped)",
            entries.len(),
            skipped
        );

        entries
    }

    /// Extracts one entry from a user block, or `None` if it lacks a name or address
    fn parse_container(&self, container: ElementRef<'_>) -> Option<LeaderboardEntry> {
        let link = container.select(&self.rules.primary_link).next()?;

        let name = link
            .select(&self.rules.heading)
            .next()
            .map(element_text)
            .filter(|name| !name.is_empty())?;

        let address = link
            .value()
            .attr("href")
            .and_then(last_path_segment)?;

        let pfp_url = container
            .select(&self.rules.avatar)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| absolutize(src, &self.rules.origin));

        let twitter_url = self.social_link(container);

        let (realized_pnl, realized_pnl_usd) = self.profit_values(container);

        Some(LeaderboardEntry {
            name,
            address,
            realized_pnl,
            realized_pnl_usd,
            pfp_url,
            twitter_url,
        })
    }

    /// Resolves the social profile link of a user block
    fn social_link(&self, container: ElementRef<'_>) -> Option<String> {
        let hrefs = || {
            container
                .select(&self.rules.link)
                .filter_map(|a| a.value().attr("href").map(|href| (a, href.trim())))
                .filter(|(_, href)| !href.is_empty())
        };

        if let Some((_, href)) = hrefs().find(|(_, href)| {
            host_matches_any(href, &self.rules.social_domains)
        }) {
            return Some(href.to_string());
        }

        if self.rules.social_icon_label.is_empty() {
            return None;
        }

        hrefs()
            .find(|(a, _)| {
                a.select(&self.rules.labelled_image).any(|img| {
                    img.value()
                        .attr("alt")
                        .is_some_and(|alt| alt.trim().to_lowercase() == self.rules.social_icon_label)
                })
            })
            .and_then(|(_, href)| absolutize(href, &self.rules.origin))
    }

    /// Returns `(realized_pnl, realized_pnl_usd)`; missing values are empty strings
    fn profit_values(&self, container: ElementRef<'_>) -> (String, String) {
        let Some(profit) = container.select(&self.rules.profit).next() else {
            return (String::new(), String::new());
        };

        let mut headings = profit.select(&self.rules.heading).map(element_text);

        let native = headings
            .next()
            .map(|text| strip_unit(&text, &self.rules.pnl_unit_suffix))
            .unwrap_or_default();

        let usd = headings
            .next()
            .map(|text| strip_chars(&text, &self.rules.currency_chars))
            .unwrap_or_default();

        (native, usd)
    }
}

/// Collects the trimmed text content of an element
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Removes a trailing unit (e.g. `12.5Sol` → `12.5`)
fn strip_unit(text: &str, unit: &str) -> String {
    let text = text.trim();
    if unit.is_empty() {
        return text.to_string();
    }
    text.strip_suffix(unit).unwrap_or(text).trim().to_string()
}

/// Removes every occurrence of the given characters (e.g. `($1,234.56)` → `1,234.56`)
fn strip_chars(text: &str, chars: &[char]) -> String {
    text.chars()
        .filter(|c| !chars.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

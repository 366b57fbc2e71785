//! Leaderboard entry type shared by the parser, cache, and HTTP surface

use serde::{Deserialize, Serialize};

/// One ranked participant as scraped from the leaderboard page
///
/// Monetary values are kept as text so the upstream sign and precision
/// survive untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Display name
    pub name: String,

    /// Profile identifier taken from the profile link; unique per result set
    pub address: String,

    /// Realized profit in the platform's native unit, unit suffix removed
    pub realized_pnl: String,

    /// USD equivalent of the realized profit, currency symbol removed
    pub realized_pnl_usd: String,

    /// Absolute avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfp_url: Option<String>,

    /// Absolute social profile URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LeaderboardEntry {
        LeaderboardEntry {
            name: "Cented".to_string(),
            address: "CyaE1VxvBrahnPWkqm5VsdCvyS2QmNht2UFrKJHga54o".to_string(),
            realized_pnl: "+112.44".to_string(),
            realized_pnl_usd: "16,342.8".to_string(),
            pfp_url: Some("https://cdn.kolscan.io/profiles/cented.png".to_string()),
            twitter_url: None,
        }
    }

    #[test]
    fn test_serializes_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["realizedPnl"], "+112.44");
        assert_eq!(json["realizedPnlUsd"], "16,342.8");
        assert_eq!(json["pfpUrl"], "https://cdn.kolscan.io/profiles/cented.png");
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let json = serde_json::to_value(sample()).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("twitterUrl"));
        assert_eq!(object.len(), 5);
    }
}

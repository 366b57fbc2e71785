use crate::config::types::{
    CacheConfig, Config, MarkupConfig, RateLimitConfig, ServerConfig, UpstreamConfig,
};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_upstream_config(&config.upstream)?;
    validate_cache_config(&config.cache)?;
    validate_rate_limit_config(&config.rate_limit)?;
    validate_markup_config(&config.markup)?;
    Ok(())
}

/// Validates the listener address
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind address '{}': {}", config.bind, e))
    })?;
    Ok(())
}

/// Validates upstream configuration
fn validate_upstream_config(config: &UpstreamConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid upstream url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "Upstream url '{}' must use http or https",
            config.url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Upstream url '{}' has no host",
            config.url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.freshness_secs == 0 {
        return Err(ConfigError::Validation(
            "freshness-secs must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn validate_rate_limit_config(config: &RateLimitConfig) -> Result<(), ConfigError> {
    if config.max_requests == 0 {
        return Err(ConfigError::Validation(
            "max-requests must be >= 1".to_string(),
        ));
    }

    if config.window_secs == 0 {
        return Err(ConfigError::Validation(
            "window-secs must be >= 1".to_string(),
        ));
    }

    if config.sweep_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "sweep-interval-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates markup matching rules
fn validate_markup_config(config: &MarkupConfig) -> Result<(), ConfigError> {
    if config.container_class_prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "container-class-prefix cannot be empty".to_string(),
        ));
    }

    if config.profit_class_prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "profit-class-prefix cannot be empty".to_string(),
        ));
    }

    // Prefixes end up inside a CSS attribute selector
    for prefix in [&config.container_class_prefix, &config.profit_class_prefix] {
        if prefix.contains(['"', '\\', ']']) {
            return Err(ConfigError::Validation(format!(
                "Class prefix '{}' contains characters not allowed in a selector",
                prefix
            )));
        }
    }

    for domain in &config.social_domains {
        validate_domain_string(domain)?;
    }

    Ok(())
}

/// Validates a bare domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::Validation(
            "Social domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' must contain at least one dot (e.g., 'x.com')",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_domain_string() {
        assert!(validate_domain_string("x.com").is_ok());
        assert!(validate_domain_string("twitter.com").is_ok());
        assert!(validate_domain_string("mobile.twitter.com").is_ok());

        assert!(validate_domain_string("").is_err());
        assert!(validate_domain_string("twitter").is_err());
        assert!(validate_domain_string(".x.com").is_err());
        assert!(validate_domain_string("x.com.").is_err());
        assert!(validate_domain_string("x..com").is_err());
        assert!(validate_domain_string("x.com/path").is_err());
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let mut config = Config::default();
        config.server.bind = "localhost".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_non_http_upstream() {
        let mut config = Config::default();
        config.upstream.url = "ftp://kolscan.io/leaderboard".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_connect_timeout_longer_than_total() {
        let mut config = Config::default();
        config.upstream.timeout_secs = 3;
        config.upstream.connect_timeout_secs = 5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = Config::default();
        config.rate_limit.window_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_selector_breaking_prefix() {
        let mut config = Config::default();
        config.markup.container_class_prefix = "user\"]".to_string();
        assert!(validate(&config).is_err());
    }
}

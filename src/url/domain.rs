use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kol_board::url::extract_domain;
///
/// let url = Url::parse("https://X.com/cented7").unwrap();
/// assert_eq!(extract_domain(&url), Some("x.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether `host` is `domain` or one of its subdomains
///
/// Both arguments are expected in lowercase. A bare substring match is not
/// enough: `x.com` must not match `box.com`.
pub fn matches_domain(domain: &str, host: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Checks whether an href points at a host in `domains`
///
/// Relative or unparseable hrefs never match.
pub fn host_matches_any(href: &str, domains: &[String]) -> bool {
    let Ok(url) = Url::parse(href.trim()) else {
        return false;
    };

    match extract_domain(&url) {
        Some(host) => domains
            .iter()
            .any(|domain| matches_domain(&domain.to_lowercase(), &host)),
        None => false,
    }
}

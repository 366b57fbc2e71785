use url::Url;

/// Returns the origin of a URL (`scheme://host[:port]/`)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kol_board::url::origin_of;
///
/// let page = Url::parse("https://kolscan.io/leaderboard?tab=daily").unwrap();
/// assert_eq!(origin_of(&page).as_str(), "https://kolscan.io/");
/// ```
pub fn origin_of(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}

/// Resolves an image or link reference to an absolute URL
///
/// Absolute URLs pass through unchanged. Anything else is resolved against
/// `origin`, so `/img/x.png` becomes `https://<origin>/img/x.png`.
/// Blank references yield `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use kol_board::url::absolutize;
///
/// let origin = Url::parse("https://kolscan.io/").unwrap();
/// assert_eq!(
///     absolutize("/img/x.png", &origin),
///     Some("https://kolscan.io/img/x.png".to_string())
/// );
/// ```
pub fn absolutize(reference: &str, origin: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    if Url::parse(reference).is_ok() {
        return Some(reference.to_string());
    }

    origin.join(reference).ok().map(|url| url.to_string())
}

/// Returns the final path segment of an href
///
/// Query strings, fragments, and trailing slashes are ignored. Returns
/// `None` when no non-empty segment remains.
///
/// # Examples
///
/// ```
/// use kol_board::url::last_path_segment;
///
/// assert_eq!(last_path_segment("/account/Abc123?tab=1"), Some("Abc123".to_string()));
/// assert_eq!(last_path_segment("/"), None);
/// ```
pub fn last_path_segment(href: &str) -> Option<String> {
    let path = href
        .trim()
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let segment = path.rsplit('/').next().unwrap_or_default().trim();

    // A bare origin like "https://host" leaves the host as the last segment
    if segment.is_empty() || path.ends_with(':') || path.ends_with(&format!("//{}", segment)) {
        return None;
    }

    Some(segment.to_string())
}

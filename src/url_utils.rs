//! URL Utility Functions
//!
//! URL validation, href resolution against the page's origin, and
//! chapter-number inference for navigation links.

use url::Url;

use crate::patterns::CHAPTER_URL_MARKER;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Parse a URL string into a Url object.
///
/// # Returns
/// * `Some(Url)` if valid absolute URL, `None` otherwise
#[must_use]
pub fn parse_url(url_str: &str) -> Option<Url> {
    let (is_abs, parsed) = is_absolute_url(url_str);
    if is_abs {
        parsed
    } else {
        None
    }
}

/// Get the base URL (scheme + host, plus any non-default port) from a URL.
///
/// # Returns
/// * The base URL in format `scheme://host[:port]`, or empty string if invalid
#[must_use]
pub fn get_base_url(url_str: &str) -> String {
    parse_url(url_str)
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_default()
}

/// Whether an href can never lead to another page.
///
/// Empty, fragment-only and `javascript:` hrefs are placeholders that reader
/// UIs attach to disabled buttons.
#[must_use]
pub fn is_placeholder_href(href: &str) -> bool {
    let href = href.trim();
    href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:")
}

/// Resolve an anchor href against the page's base URL (`scheme://host`).
///
/// Absolute hrefs are returned unchanged. Relative hrefs, including
/// path-relative ones, are joined onto the base, so `chuong-2` on
/// `https://a.com/truyen/x/chuong-1` resolves to `https://a.com/chuong-2`.
///
/// # Returns
/// * `None` for placeholder hrefs or when the join fails
#[must_use]
pub fn resolve_href(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if is_placeholder_href(href) {
        return None;
    }

    if let Some(absolute) = parse_url(href) {
        return Some(absolute.to_string());
    }

    let base = Url::parse(base_url).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}

/// Build the previous/next chapter URLs from the last `chuong-N` /
/// `chapter-N` marker of `url`.
///
/// The marker number is replaced in place by N-1 and N+1; everything else in
/// the URL is kept. Nothing is verified against the network.
///
/// # Returns
/// * `(previous, next)` - `previous` is `None` when N <= 1; both are `None`
///   when the URL carries no marker
#[must_use]
pub fn infer_chapter_neighbours(url: &str) -> (Option<String>, Option<String>) {
    let Some(caps) = CHAPTER_URL_MARKER.captures_iter(url).last() else {
        return (None, None);
    };
    let Some(number) = caps.get(2) else {
        return (None, None);
    };
    let Ok(n) = number.as_str().parse::<u64>() else {
        return (None, None);
    };

    let head = &url[..number.start()];
    let tail = &url[number.end()..];

    let previous = (n > 1).then(|| format!("{head}{}{tail}", n - 1));
    let next = n.checked_add(1).map(|m| format!("{head}{m}{tail}"));

    (previous, next)
}

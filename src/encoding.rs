//! Character encoding detection and transcoding.
//!
//! Chapter pages on older Vietnamese hosts still ship legacy charsets. The
//! charset is taken from the HTTP `Content-Type` header when present, then
//! from the document's `<meta>` tags, and the body is converted to UTF-8.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// Match `<meta charset="...">` tag
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// Match the `charset=` parameter of a `Content-Type` value
static CHARSET_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i);\s*charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex")
});

/// Number of leading bytes searched for `<meta>` declarations.
const SNIFF_LEN: usize = 1024;

/// Charset label declared by a `Content-Type` header value.
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    CHARSET_PARAM_RE
        .captures(content_type)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
}

/// Detect character encoding from HTML bytes.
///
/// Looks at `<meta charset>` and `<meta http-equiv="Content-Type">` in the
/// first 1024 bytes; defaults to UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = &html[..html.len().min(SNIFF_LEN)];
    let head_str = String::from_utf8_lossy(head);

    // The http-equiv form carries "content-type" before the charset
    // parameter, and the generic pattern catches it as well.
    CHARSET_META_RE
        .captures(&head_str)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Transcode HTML bytes to UTF-8, replacing invalid sequences with U+FFFD.
///
/// A charset in `content_type` wins over in-document declarations.
///
/// # Examples
///
/// ```
/// use rs_chapter_extract::encoding::transcode_to_utf8;
///
/// let html = b"<html><body>Ch\xE0o</body></html>";
/// let text = transcode_to_utf8(html, Some("text/html; charset=windows-1252"));
/// assert!(text.contains("Chào"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .unwrap_or_else(|| detect_encoding(html));

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        tracing::debug!(encoding = used.name(), "transcoding replaced invalid sequences");
    }
    decoded.into_owned()
}

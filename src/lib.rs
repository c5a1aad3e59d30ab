//! # rs-chapter-extract
//!
//! Readable chapter text and next/previous chapter links from web novel pages.
//!
//! Chapter pages bury a few thousand words of prose under menus, rating
//! bars, comment sections and reader-configuration panels, with no markup
//! guarantees between sites. This library finds the main text block with a
//! fallback-driven heuristic pipeline, filters the noise out line by line,
//! rebuilds paragraphs and resolves the links to the neighbouring chapters.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_chapter_extract::{extract_html, Options};
//!
//! let para = "The caravan crossed the dunes at dawn, its bells ringing softly over the sand.";
//! let html = format!(
//!     "<html><head><title>Chapter 1 - Dunes</title></head><body><article>\
//!      <p>{para} {para}</p><p>{para} {para}</p><p>{para} {para}</p>\
//!      <a rel=\"next\" href=\"/novel/chapter-2\">Next</a></article></body></html>"
//! );
//!
//! let result = extract_html(&html, "https://example.com/novel/chapter-1", &Options::default())?;
//! assert_eq!(result.title, "Chapter 1");
//! assert!(result.content.contains("caravan"));
//! assert_eq!(result.navigation.next.as_deref(), Some("https://example.com/novel/chapter-2"));
//! # Ok::<(), rs_chapter_extract::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Block discovery**: four ordered strategies from site-profiled selectors
//!   down to the largest text container, scored by text density
//! - **Noise removal**: line filter, deep cleaner and a Vietnamese reader
//!   cleaner, each guarded against over-cleaning
//! - **Navigation**: previous/next chapter links from selectors, anchor text,
//!   icon classes or the chapter number in the URL
//! - **Site profiles**: a specialized extractor for metruyencv.com and tuned
//!   behavior for other known hosts
//! - **Fetching**: any [`PageFetcher`]; a blocking `reqwest` implementation
//!   ships behind the `http` feature
//!
//! Every decision is recorded in the result's [`CleaningTrace`] and emitted
//! as a `tracing` debug event.

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// Content cleaning passes (deep cleaner and Vietnamese cleaner).
pub mod cleaning;

/// Candidate block discovery strategies.
pub mod discovery;

/// DOM operations over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Page retrieval interface and the TLS retry policy.
pub mod fetch;

/// Line-level noise filter.
pub mod line_filter;

/// Previous/next chapter link resolution.
pub mod navigation;

/// Paragraph reconstruction from filtered lines.
pub mod paragraphs;

/// Site profiles and the per-call site context.
pub mod profile;

/// Block scoring and selection.
pub mod scoring;

/// Specialized extractor for metruyencv.com chapter pages.
pub mod specialized;

/// Reader preferences, reading history and annotations.
pub mod store;

/// URL utilities for validation, resolution and chapter number inference.
pub mod url_utils;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::FALLBACK_TITLE;
#[cfg(feature = "http")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchError, FetchRequest, FetchedPage, PageFetcher};
pub use options::Options;
pub use profile::{SiteContext, SiteProfile};
pub use result::{CleaningTrace, ExtractionResult, NavigationLinks, NO_CONTENT_TITLE};
pub use store::{JsonFileStore, PersistenceStore, Preferences, StoreError};

use std::time::Instant;

/// Fetches a chapter page and extracts it using default options.
///
/// # Arguments
///
/// * `url` - Absolute http(s) URL of the chapter page
/// * `fetcher` - Retrieves the page
///
/// # Returns
///
/// Returns `Ok(ExtractionResult)` once the page was fetched, even when no
/// content survived (see [`ExtractionResult::is_empty`]). Returns an `Error`
/// for an invalid URL or a failed fetch.
///
/// # Example
///
/// ```rust
/// use rs_chapter_extract::{extract, FetchError, FetchRequest, FetchedPage, PageFetcher};
///
/// struct Offline;
///
/// impl PageFetcher for Offline {
///     fn fetch(&self, request: &FetchRequest) -> Result<FetchedPage, FetchError> {
///         Ok(FetchedPage {
///             html: "<html><body><p>Too short.</p></body></html>".to_string(),
///             final_url: request.url.clone(),
///         })
///     }
/// }
///
/// let result = extract("https://example.com/chapter-1", &Offline)?;
/// assert!(result.is_empty());
/// # Ok::<(), rs_chapter_extract::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract<F: PageFetcher + ?Sized>(url: &str, fetcher: &F) -> Result<ExtractionResult> {
    extract_with_options(url, fetcher, &Options::default())
}

/// Fetches a chapter page and extracts it with custom options.
///
/// The options' timeouts are applied to the request after the site
/// profile's floor.
#[allow(clippy::missing_errors_doc)]
pub fn extract_with_options<F: PageFetcher + ?Sized>(
    url: &str,
    fetcher: &F,
    options: &Options,
) -> Result<ExtractionResult> {
    extract::extract_page(url, fetcher, options)
}

/// Extracts already retrieved markup.
///
/// `url` is the page's address; it selects the site profile and resolves
/// relative navigation links.
///
/// # Returns
///
/// Returns an `Error` only when `url` is not an absolute http(s) URL.
#[allow(clippy::missing_errors_doc)]
pub fn extract_html(html: &str, url: &str, options: &Options) -> Result<ExtractionResult> {
    let started = Instant::now();
    let ctx = SiteContext::parse(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    Ok(extract::extract_document(html, &ctx, options, started, CleaningTrace::new()))
}

/// Extracts markup given as raw bytes, detecting its character encoding.
///
/// # Character Encoding
///
/// The charset is taken from `content_type` (an HTTP `Content-Type` value)
/// when it names one, otherwise from `<meta charset>` or
/// `<meta http-equiv="Content-Type">`, defaulting to UTF-8. Invalid
/// sequences are replaced with U+FFFD.
///
/// # Example
///
/// ```rust
/// use rs_chapter_extract::{extract_bytes, Options};
///
/// let html = b"<html><head><meta charset=\"windows-1252\"></head><body><p>Caf\xE9</p></body></html>";
/// let result = extract_bytes(html, None, "https://example.com/", &Options::default())?;
/// assert!(result.is_empty());
/// # Ok::<(), rs_chapter_extract::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn extract_bytes(html: &[u8], content_type: Option<&str>, url: &str, options: &Options) -> Result<ExtractionResult> {
    let html = encoding::transcode_to_utf8(html, content_type);
    extract_html(&html, url, options)
}

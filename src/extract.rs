//! Chapter extraction pipeline.
//!
//! Wires the stages together for one page: navigation is resolved on the
//! untouched tree, then either the site's specialized extractor or the
//! generic discovery/scoring/filtering chain produces the text, which both
//! cleaners then polish.

use std::time::Instant;

use crate::cleaning::{clean_vietnamese, deep_clean};
use crate::discovery::{discover, strip_noise};
use crate::dom::{self, Document};
use crate::error::{Error, Result};
use crate::fetch::{fetch_with_tls_retry, FetchRequest, PageFetcher};
use crate::line_filter::filter_lines;
use crate::navigation::resolve_navigation;
use crate::options::Options;
use crate::paragraphs::{reconstruct, rescue_short_output};
use crate::profile::{Locale, SiteContext, SiteProfile};
use crate::result::{CleaningTrace, ExtractionResult};
use crate::scoring::{select_best, ScoringMode};
use crate::specialized::extract_specialized;

/// Title used when the page has no usable `<title>`.
pub const FALLBACK_TITLE: &str = "Extracted Content";

/// Fetches `url` through `fetcher` and extracts it.
pub(crate) fn extract_page<F: PageFetcher + ?Sized>(
    url: &str,
    fetcher: &F,
    options: &Options,
) -> Result<ExtractionResult> {
    let started = Instant::now();
    let mut trace = CleaningTrace::new();

    let ctx = SiteContext::parse(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    trace.push(format!("Fetching {} (profile: {})", ctx.url, ctx.profile.label()));

    let request = FetchRequest::for_context(&ctx, options);
    let page = fetch_with_tls_retry(fetcher, &request, &mut trace)?;

    // Redirects may land on another host; links resolve against where we ended up
    let ctx = match SiteContext::parse(&page.final_url) {
        Some(landed) if landed.url != ctx.url => {
            trace.push(format!("Redirected to {}", landed.url));
            landed
        }
        _ => ctx,
    };

    Ok(extract_document(&page.html, &ctx, options, started, trace))
}

/// Runs the pipeline over already retrieved markup.
///
/// Never fails: a page without readable content yields the
/// "No content found" sentinel.
pub(crate) fn extract_document(
    html: &str,
    ctx: &SiteContext,
    options: &Options,
    started: Instant,
    mut trace: CleaningTrace,
) -> ExtractionResult {
    tracing::debug!(url = %ctx.url, bytes = html.len(), "extracting chapter");

    let doc = dom::parse(html);
    let mut title = dom::page_title(&doc).unwrap_or_else(|| FALLBACK_TITLE.to_string());
    trace.push(format!("Title: {title}"));

    trace.push("Looking for chapter navigation links");
    let navigation = resolve_navigation(&doc, ctx, &mut trace);

    let mut content = None;
    if ctx.profile.has_specialized_extractor() {
        trace.push(format!("Using {} specialized extraction", ctx.profile.label()));
        match extract_specialized(&doc, &mut trace) {
            Some(found) if dom::char_len(&found.content) > options.min_content_chars => {
                if let Some(chapter_title) = found.title {
                    title = chapter_title;
                }
                content = Some(found.content);
            }
            _ => trace.push("Specialized extraction came up short, using the generic pipeline"),
        }
    }

    let content = match content {
        Some(content) => content,
        None => generic_content(&doc, ctx, options, &mut trace),
    };

    let content = deep_clean(&content, options, &mut trace);
    let content = match ctx.profile.locale() {
        Some(Locale::Vietnamese) => clean_vietnamese(&content, options, &mut trace),
        None => content,
    };

    let elapsed = started.elapsed();
    trace.push(format!("Extraction completed in {:.2} seconds", elapsed.as_secs_f64()));

    if dom::char_len(content.trim()) < options.min_content_chars {
        tracing::debug!(url = %ctx.url, "no readable content survived");
        return ExtractionResult::no_content(elapsed, trace);
    }

    ExtractionResult {
        title,
        content,
        elapsed,
        trace,
        navigation,
    }
}

/// Noise stripping, discovery, scoring, line filtering and paragraph
/// reconstruction.
fn generic_content(doc: &Document, ctx: &SiteContext, options: &Options, trace: &mut CleaningTrace) -> String {
    let removed = strip_noise(doc);
    trace.push(format!("Removed {removed} non-content elements"));

    let blocks = discover(doc, ctx, options, trace);
    let mode = ScoringMode::for_novel(ctx.is_novel());
    let Some(best) = select_best(blocks, mode, options) else {
        return String::new();
    };
    let tag = best
        .source
        .and_then(|handle| handle.resolve(doc))
        .and_then(|sel| dom::tag_name(&sel))
        .unwrap_or_else(|| "text".to_string());
    trace.push(format!(
        "Selected <{tag}> block via {}: {} chars, ratio {:.2}, {} paragraphs, score {:.1}",
        best.origin, best.text_len, best.ratio, best.paragraph_count, best.score
    ));

    let lines = filter_lines(&best.text, ctx.is_novel(), options, trace);
    let mut content = reconstruct(&lines, ctx.is_novel(), options, trace);
    if let Some(rescued) = rescue_short_output(&content, &best.text, trace) {
        content = rescued;
    }

    if ctx.profile == SiteProfile::Metruyencv && dom::char_len(content.trim()) < options.min_content_chars {
        trace.push("Content too short, trying the #article element directly");
        let article = doc.select("#article");
        if article.exists() {
            let text = article.text().to_string();
            if dom::char_len(&text) > options.min_content_chars {
                trace.push("Extracted content directly from #article");
                content = text;
            }
        }
    }

    content
}

//! Candidate Block Discovery
//!
//! Finds the elements that may hold the chapter text. Strategies run in a
//! fixed order and discovery stops at the first one that yields a block:
//!
//! 1. **Profiled selectors**: site, novel, news and generic selector lists
//! 2. **Dense containers**: every `div`/`section` with enough text
//! 3. **Max paragraphs**: the container with the most `<p>` descendants
//! 4. **Largest text**: the container with the most text
//!
//! When all four come back empty the whole body becomes a single block.

#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{self, Document, NodeHandle, NodeId, Selection};
use crate::options::Options;
use crate::profile::SiteContext;
use crate::result::CleaningTrace;

/// Selectors tried on novel-flagged sites, ahead of the generic ones.
pub const NOVEL_SELECTORS: &[&str] = &[
    ".chapter-content",
    ".chapter-inner",
    ".chapter",
    "#chapter",
    ".chapter-text",
    ".reading-content",
    "#novel-content",
    ".novel-content",
];

/// Selectors tried when the page has an `<article>` or is a news domain.
pub const ARTICLE_SELECTORS: &[&str] = &[
    ".post-content",
    ".entry-content",
    ".article-content",
    ".article__content",
    ".article-body",
    ".story-body",
    ".story-content",
];

/// Selectors tried on every page, last.
pub const GENERIC_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    ".content",
    "#content",
    ".post",
    ".article",
    ".entry",
    ".page-content",
    ".post-content",
    ".story",
];

/// Elements removed before discovery on the generic path.
pub const NOISE_SELECTOR: &str = "script, style, noscript, meta, link, head, iframe, svg, \
    [role=\"banner\"], [role=\"navigation\"], [role=\"complementary\"], [role=\"search\"], \
    [role=\"form\"], [role=\"region\"], [role=\"alert\"], \
    .ads, .ad-container, .advertisement, .sidebar, .comments, .comment-section, \
    nav, header, footer";

/// Markup tags, used when the parsed tree carries no text at all.
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("MARKUP_TAG regex"));

/// Strategy that produced a candidate block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryStrategy {
    /// Profiled selector list.
    Profiled,
    /// Dense `div`/`section` scan.
    DenseContainer,
    /// Container with the most paragraphs.
    MaxParagraphs,
    /// Container with the most text.
    LargestText,
    /// Whole-body pseudo-block.
    Body,
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Profiled => "profiled selectors",
            Self::DenseContainer => "dense container scan",
            Self::MaxParagraphs => "max paragraph count",
            Self::LargestText => "largest text",
            Self::Body => "body text",
        };
        f.write_str(name)
    }
}

/// A candidate main-content container and its measurements.
///
/// Lengths are counted in characters. `score` is filled in by
/// [`crate::scoring::rank`].
#[derive(Debug, Clone)]
pub struct ContentBlock {
    /// Element the block was taken from; `None` for the raw-text fallback.
    pub source: Option<NodeHandle>,
    /// Block text with one line per block-level element.
    pub text: String,
    /// Length of the trimmed text.
    pub text_len: usize,
    /// Length of the serialized markup.
    pub html_len: usize,
    /// `text_len / html_len`, 0 when there is no markup.
    pub ratio: f64,
    /// Number of `<p>` descendants.
    pub paragraph_count: usize,
    /// Paragraphs per 500 characters of text.
    pub paragraph_density: f64,
    /// Heuristic rank.
    pub score: f64,
    /// Strategy that found the block.
    pub origin: DiscoveryStrategy,
}

impl ContentBlock {
    /// Measures an element.
    #[must_use]
    pub fn from_selection(sel: &Selection, origin: DiscoveryStrategy, options: &Options) -> Self {
        let text = dom::block_text(sel);
        let html_len = dom::markup_len(sel);
        let paragraph_count = sel.select("p").length();
        Self::measure(NodeHandle::of(sel), text, html_len, paragraph_count, origin, options)
    }

    /// Builds a block from already extracted text.
    #[must_use]
    pub fn measure(
        source: Option<NodeHandle>,
        text: String,
        html_len: usize,
        paragraph_count: usize,
        origin: DiscoveryStrategy,
        options: &Options,
    ) -> Self {
        let text_len = dom::char_len(text.trim());
        let ratio = if html_len == 0 {
            0.0
        } else {
            (text_len as f64 / html_len as f64).min(1.0)
        };
        let paragraph_density =
            paragraph_count as f64 / (text_len as f64 / options.paragraph_density_chars).max(1.0);

        Self {
            source,
            text,
            text_len,
            html_len,
            ratio,
            paragraph_count,
            paragraph_density,
            score: 0.0,
            origin,
        }
    }
}

/// A discovery strategy: returns the blocks it found, possibly none.
pub type Strategy = fn(&Document, &SiteContext, &Options) -> Vec<ContentBlock>;

/// Strategies in the order they are tried.
pub static STRATEGIES: &[(DiscoveryStrategy, Strategy)] = &[
    (DiscoveryStrategy::Profiled, profiled_selectors),
    (DiscoveryStrategy::DenseContainer, dense_containers),
    (DiscoveryStrategy::MaxParagraphs, max_paragraphs),
    (DiscoveryStrategy::LargestText, largest_text),
];

/// Removes elements that never hold chapter text.
///
/// Returns the number of removed elements.
pub fn strip_noise(doc: &Document) -> usize {
    dom::remove_matching(&doc.select("html"), NOISE_SELECTOR)
}

/// Runs the strategies in order and returns the first non-empty result.
///
/// Never returns an empty vector: the body fallback always yields a block.
#[must_use]
pub fn discover(
    doc: &Document,
    ctx: &SiteContext,
    options: &Options,
    trace: &mut CleaningTrace,
) -> Vec<ContentBlock> {
    for (kind, strategy) in STRATEGIES {
        let blocks = strategy(doc, ctx, options);
        if !blocks.is_empty() {
            trace.push(format!("Found {} candidate block(s) via {kind}", blocks.len()));
            return blocks;
        }
        tracing::debug!(strategy = %kind, "no candidates");
    }

    trace.push("No candidate blocks, falling back to body text");
    vec![body_block(doc, options)]
}

/// Ordered selector list for a page.
#[must_use]
pub fn selector_list(doc: &Document, ctx: &SiteContext) -> Vec<&'static str> {
    let mut selectors: Vec<&'static str> = ctx.profile.prepended_selectors().to_vec();
    if ctx.is_novel() {
        selectors.extend_from_slice(NOVEL_SELECTORS);
    }
    if ctx.is_news || doc.select("article").exists() {
        selectors.extend_from_slice(ARTICLE_SELECTORS);
    }
    selectors.extend_from_slice(GENERIC_SELECTORS);
    selectors
}

/// Strategy A: elements matched by the profiled selector list.
#[must_use]
pub fn profiled_selectors(doc: &Document, ctx: &SiteContext, options: &Options) -> Vec<ContentBlock> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut blocks = Vec::new();

    for selector in selector_list(doc, ctx) {
        for node in doc.select(selector).nodes() {
            if !seen.insert(node.id) {
                continue;
            }
            let sel = Selection::from(*node);
            if dom::char_len(sel.text().trim()) >= options.min_selector_block_chars {
                blocks.push(ContentBlock::from_selection(&sel, DiscoveryStrategy::Profiled, options));
            }
        }
    }
    blocks
}

/// Strategy B: every `div`/`section` with more than the dense-container minimum.
#[must_use]
pub fn dense_containers(doc: &Document, _ctx: &SiteContext, options: &Options) -> Vec<ContentBlock> {
    doc.select("div, section")
        .nodes()
        .iter()
        .map(|node| Selection::from(*node))
        .filter(|sel| dom::char_len(sel.text().trim()) > options.min_dense_container_chars)
        .map(|sel| ContentBlock::from_selection(&sel, DiscoveryStrategy::DenseContainer, options))
        .collect()
}

/// Strategy C: the container with the most `<p>` descendants.
#[must_use]
pub fn max_paragraphs(doc: &Document, _ctx: &SiteContext, options: &Options) -> Vec<ContentBlock> {
    let mut best: Option<(usize, Selection)> = None;

    for node in doc.select("div, article, section").nodes() {
        let sel = Selection::from(*node);
        let paragraphs = sel.select("p");
        let count = paragraphs.length();
        if count == 0 || best.as_ref().is_some_and(|(n, _)| count <= *n) {
            continue;
        }
        let combined: usize = paragraphs
            .nodes()
            .iter()
            .map(|p| dom::char_len(p.text().trim()))
            .sum();
        if combined > options.min_paragraph_text_chars {
            best = Some((count, sel));
        }
    }

    best.map(|(_, sel)| vec![ContentBlock::from_selection(&sel, DiscoveryStrategy::MaxParagraphs, options)])
        .unwrap_or_default()
}

/// Strategy D: the container with the most text.
#[must_use]
pub fn largest_text(doc: &Document, _ctx: &SiteContext, options: &Options) -> Vec<ContentBlock> {
    let mut best: Option<(usize, Selection)> = None;

    for node in doc.select("div, article, section, main").nodes() {
        let sel = Selection::from(*node);
        let len = dom::char_len(sel.text().trim());
        if best.as_ref().is_none_or(|(n, _)| len > *n) {
            best = Some((len, sel));
        }
    }

    match best {
        Some((len, sel)) if len > options.min_largest_text_chars => {
            vec![ContentBlock::from_selection(&sel, DiscoveryStrategy::LargestText, options)]
        }
        _ => Vec::new(),
    }
}

/// Whole-body pseudo-block.
///
/// Degrades to the root element's text and finally to the raw markup with
/// tags stripped when the tree carries no text.
#[must_use]
pub fn body_block(doc: &Document, options: &Options) -> ContentBlock {
    for selector in ["body", "html"] {
        let sel = doc.select(selector);
        if sel.exists() && !sel.text().trim().is_empty() {
            return ContentBlock::from_selection(&sel, DiscoveryStrategy::Body, options);
        }
    }

    let raw = doc.html();
    let text = MARKUP_TAG.replace_all(&raw, "\n").into_owned();
    ContentBlock::measure(None, text, dom::char_len(&raw), 0, DiscoveryStrategy::Body, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(url: &str) -> SiteContext {
        SiteContext::parse(url).expect("valid url")
    }

    fn words(n: usize) -> String {
        "lorem ".repeat(n / 6 + 1)
    }

    #[test]
    fn test_ratio_is_zero_without_markup() {
        let block = ContentBlock::measure(None, "text".into(), 0, 0, DiscoveryStrategy::Body, &Options::default());
        assert!(block.ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_within_bounds() {
        let doc = dom::parse(&format!("<div id='x'><p>{}</p></div>", words(400)));
        let block = ContentBlock::from_selection(&doc.select("#x"), DiscoveryStrategy::Profiled, &Options::default());
        assert!(block.ratio > 0.0 && block.ratio <= 1.0);
        assert_eq!(block.paragraph_count, 1);
    }

    #[test]
    fn test_selector_order_for_novel_site() {
        let doc = dom::parse("<html><body><article></article></body></html>");
        let list = selector_list(&doc, &ctx("https://truyenfull.vn/x/chuong-1"));
        assert_eq!(list[0], ".nh-read__content");
        let novel_at = list.iter().position(|s| *s == ".chapter-inner").expect("novel selector");
        let news_at = list.iter().position(|s| *s == ".entry-content").expect("news selector");
        let generic_at = list.iter().position(|s| *s == "main").expect("generic selector");
        assert!(novel_at < news_at && news_at < generic_at);
    }

    #[test]
    fn test_generic_site_skips_novel_and_news_selectors() {
        let doc = dom::parse("<html><body><div></div></body></html>");
        let list = selector_list(&doc, &ctx("https://example.com/page"));
        assert!(!list.contains(&".chapter-inner"));
        assert!(!list.contains(&".entry-content"));
        assert_eq!(list.first(), Some(&"article"));
    }

    #[test]
    fn test_profiled_deduplicates_elements() {
        // `article.content` matches both "article" and ".content"
        let html = format!("<html><body><article class='content'>{}</article></body></html>", words(300));
        let doc = dom::parse(&html);
        let blocks = profiled_selectors(&doc, &ctx("https://example.com/"), &Options::default());
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_dense_containers_threshold() {
        let html = format!(
            "<html><body><div id='a'>{}</div><section>short</section></body></html>",
            words(350)
        );
        let doc = dom::parse(&html);
        let blocks = dense_containers(&doc, &ctx("https://example.com/"), &Options::default());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].origin, DiscoveryStrategy::DenseContainer);
    }

    #[test]
    fn test_max_paragraphs_picks_first_maximum() {
        let p = format!("<p>{}</p>", words(120));
        let html = format!(
            "<html><body><div id='one'>{p}{p}</div><div id='two'>{p}{p}</div></body></html>"
        );
        let doc = dom::parse(&html);
        let blocks = max_paragraphs(&doc, &ctx("https://example.com/"), &Options::default());
        assert_eq!(blocks.len(), 1);
        let first = NodeHandle::of(&doc.select("#one"));
        assert_eq!(blocks[0].source, first);
    }

    #[test]
    fn test_largest_text_requires_minimum() {
        let doc = dom::parse("<html><body><div>tiny</div></body></html>");
        assert!(largest_text(&doc, &ctx("https://example.com/"), &Options::default()).is_empty());
    }

    #[test]
    fn test_body_fallback_when_nothing_qualifies() {
        let doc = dom::parse("<html><body><span>Just a little text</span></body></html>");
        let mut trace = CleaningTrace::new();
        let blocks = discover(&doc, &ctx("https://example.com/"), &Options::default(), &mut trace);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].origin, DiscoveryStrategy::Body);
        assert!(blocks[0].text.contains("Just a little text"));
        assert!(trace.mentions("body"));
    }

    #[test]
    fn test_strip_noise_removes_chrome() {
        let doc = dom::parse(
            "<html><head><title>t</title></head><body><nav>menu</nav><div class='ads'>buy</div><p>keep</p><footer>f</footer></body></html>",
        );
        let removed = strip_noise(&doc);
        assert!(removed >= 4);
        assert!(!doc.select("nav").exists());
        assert!(doc.select("p").exists());
    }
}

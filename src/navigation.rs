//! Navigation Link Resolver
//!
//! Finds the previous/next chapter links of a page. Must run on the
//! untouched tree: discovery and the specialized extractor remove nodes the
//! resolver relies on.
//!
//! Resolution is a cascade of steps. Each step only fills directions that
//! are still unknown and the cascade stops once both are known. Profiled
//! hosts get four extra steps ahead of the generic ones.

use crate::dom::{self, Document, Selection};
use crate::profile::SiteContext;
use crate::result::{CleaningTrace, NavigationLinks};
use crate::url_utils::{infer_chapter_neighbours, is_placeholder_href, resolve_href};

/// Link direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Previous chapter.
    Previous,
    /// Next chapter.
    Next,
}

impl Direction {
    fn slot(self, links: &mut NavigationLinks) -> &mut Option<String> {
        match self {
            Self::Previous => &mut links.previous,
            Self::Next => &mut links.next,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

/// Containers that hold the chapter buttons on profiled hosts.
const NAV_CONTAINER_ANCHORS: &str = ".chapter-nav a, .chapter-header a, .chapter-actions a, .btn-chap a";
const NAV_NEXT_TERMS: &[&str] = &["chương sau", "tiếp", "tiếp theo", "next"];
const NAV_PREV_TERMS: &[&str] = &["chương trước", "trước", "previous", "prev"];

const ICON_NEXT_CLASSES: &[&str] = &["fa-arrow-right", "fa-angle-right", "next-chap"];
const ICON_PREV_CLASSES: &[&str] = &["fa-arrow-left", "fa-angle-left", "prev-chap"];

const PAGE_NEXT_TERMS: &[&str] = &["chương sau", "chương tiếp", "tiếp theo"];
const PAGE_PREV_TERMS: &[&str] = &["chương trước", "quay lại"];

const NEXT_SELECTORS: &[&str] = &[
    r#"a.next-chap, a.next_chapter, a.next, a.next-chapter, a[rel="next"]"#,
    ".next-chap a, .next_chapter a, .next a, .next-chapter a",
    "#next_chap, #next_chapter, #next",
];
const PREV_SELECTORS: &[&str] = &[
    r#"a.prev-chap, a.prev_chapter, a.prev, a.previous-chapter, a[rel="prev"]"#,
    ".prev-chap a, .prev_chapter a, .prev a, .previous-chapter a",
    "#prev_chap, #prev_chapter, #previous",
];

const TEXT_NEXT_TERMS: &[&str] = &["next chapter", "chương sau", "chap sau", "tiếp", "next"];
const TEXT_PREV_TERMS: &[&str] = &["previous chapter", "chương trước", "chap trước", "trước", "previous", "prev"];

/// One resolution step.
pub type NavStep = fn(&Document, &SiteContext, &mut NavigationLinks, &mut CleaningTrace);

/// Steps run first on hosts with profiled navigation.
pub static PROFILED_STEPS: &[NavStep] = &[nav_container_keywords, icon_classes, page_text_keywords, url_inference];

/// Steps run on every page.
pub static GENERIC_STEPS: &[NavStep] = &[selector_lists, anchor_text_keywords];

/// Resolves the previous/next chapter links of a page.
#[must_use]
pub fn resolve_navigation(doc: &Document, ctx: &SiteContext, trace: &mut CleaningTrace) -> NavigationLinks {
    let mut links = NavigationLinks::default();

    if ctx.profile.has_profiled_navigation() {
        trace.push(format!("Using {} navigation detection", ctx.profile.label()));
        run_steps(PROFILED_STEPS, doc, ctx, &mut links, trace);
    }
    run_steps(GENERIC_STEPS, doc, ctx, &mut links, trace);

    links
}

fn run_steps(
    steps: &[NavStep],
    doc: &Document,
    ctx: &SiteContext,
    links: &mut NavigationLinks,
    trace: &mut CleaningTrace,
) {
    for step in steps {
        if links.is_complete() {
            return;
        }
        step(doc, ctx, links, trace);
    }
}

/// Stores `href` for `direction` unless it is already known or unusable.
///
/// Returns true when the link was stored.
fn fill(
    links: &mut NavigationLinks,
    direction: Direction,
    href: &str,
    ctx: &SiteContext,
    trace: &mut CleaningTrace,
    source: &str,
) -> bool {
    let slot = direction.slot(links);
    if slot.is_some() {
        return false;
    }
    let Some(url) = resolve_href(href, &ctx.base_url) else {
        return false;
    };
    trace.push(format!("Found {} chapter URL ({source}): {url}", direction.label()));
    *slot = Some(url);
    true
}

fn anchor_text(anchor: &Selection) -> String {
    dom::text_content(anchor).trim().to_lowercase()
}

fn usable_href(anchor: &Selection) -> Option<String> {
    dom::get_attribute(anchor, "href").filter(|h| !is_placeholder_href(h))
}

fn mentions_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

/// Step 1 (profiled): keyword match on anchors inside chapter-button containers.
pub fn nav_container_keywords(doc: &Document, ctx: &SiteContext, links: &mut NavigationLinks, trace: &mut CleaningTrace) {
    for node in doc.select(NAV_CONTAINER_ANCHORS).nodes() {
        let anchor = Selection::from(*node);
        let Some(href) = usable_href(&anchor) else {
            continue;
        };
        let text = anchor_text(&anchor);
        if mentions_any(&text, NAV_NEXT_TERMS) {
            fill(links, Direction::Next, &href, ctx, trace, "chapter buttons");
        } else if mentions_any(&text, NAV_PREV_TERMS) {
            fill(links, Direction::Previous, &href, ctx, trace, "chapter buttons");
        }
    }
}

/// Classes of an anchor and of its descendants (icon elements).
fn anchor_classes(anchor: &Selection) -> Vec<String> {
    let mut classes = dom::class_tokens(anchor);
    for node in anchor.select("[class]").nodes() {
        classes.extend(dom::class_tokens(&Selection::from(*node)));
    }
    classes
}

/// Step 2 (profiled): arrow/angle icon classes on the anchor or an icon inside it.
pub fn icon_classes(doc: &Document, ctx: &SiteContext, links: &mut NavigationLinks, trace: &mut CleaningTrace) {
    for node in doc.select("a").nodes() {
        let anchor = Selection::from(*node);
        let Some(href) = usable_href(&anchor) else {
            continue;
        };
        let classes = anchor_classes(&anchor);
        let has = |set: &[&str]| classes.iter().any(|c| set.contains(&c.as_str()));
        if has(ICON_NEXT_CLASSES) {
            fill(links, Direction::Next, &href, ctx, trace, "icon");
        } else if has(ICON_PREV_CLASSES) {
            fill(links, Direction::Previous, &href, ctx, trace, "icon");
        }
    }
}

/// Step 3 (profiled): Vietnamese navigation phrases anywhere on the page.
pub fn page_text_keywords(doc: &Document, ctx: &SiteContext, links: &mut NavigationLinks, trace: &mut CleaningTrace) {
    for node in doc.select("a").nodes() {
        let anchor = Selection::from(*node);
        let Some(href) = usable_href(&anchor) else {
            continue;
        };
        let text = anchor_text(&anchor);
        if mentions_any(&text, PAGE_NEXT_TERMS) {
            fill(links, Direction::Next, &href, ctx, trace, "page text");
        }
        if mentions_any(&text, PAGE_PREV_TERMS) {
            fill(links, Direction::Previous, &href, ctx, trace, "page text");
        }
    }
}

/// Step 4 (profiled): neighbours of the chapter number in the URL.
///
/// The inferred URLs are not checked for existence.
pub fn url_inference(_doc: &Document, ctx: &SiteContext, links: &mut NavigationLinks, trace: &mut CleaningTrace) {
    let (previous, next) = infer_chapter_neighbours(ctx.url.as_str());
    if links.previous.is_none() {
        if let Some(url) = previous {
            trace.push(format!("Inferred previous chapter URL: {url}"));
            links.previous = Some(url);
        }
    }
    if links.next.is_none() {
        if let Some(url) = next {
            trace.push(format!("Inferred next chapter URL: {url}"));
            links.next = Some(url);
        }
    }
}

fn first_selector_match(doc: &Document, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        doc.select(selector)
            .nodes()
            .iter()
            .find_map(|node| usable_href(&Selection::from(*node)))
    })
}

/// Generic step 1: conventional next/prev classes, ids and `rel` values.
pub fn selector_lists(doc: &Document, ctx: &SiteContext, links: &mut NavigationLinks, trace: &mut CleaningTrace) {
    if links.next.is_none() {
        if let Some(href) = first_selector_match(doc, NEXT_SELECTORS) {
            fill(links, Direction::Next, &href, ctx, trace, "selector");
        }
    }
    if links.previous.is_none() {
        if let Some(href) = first_selector_match(doc, PREV_SELECTORS) {
            fill(links, Direction::Previous, &href, ctx, trace, "selector");
        }
    }
}

fn first_text_match(doc: &Document, terms: &[&str]) -> Option<String> {
    doc.select("a").nodes().iter().find_map(|node| {
        let anchor = Selection::from(*node);
        if mentions_any(&anchor_text(&anchor), terms) {
            usable_href(&anchor)
        } else {
            None
        }
    })
}

/// Generic step 2: English and Vietnamese anchor-text keywords.
pub fn anchor_text_keywords(doc: &Document, ctx: &SiteContext, links: &mut NavigationLinks, trace: &mut CleaningTrace) {
    if links.next.is_none() {
        if let Some(href) = first_text_match(doc, TEXT_NEXT_TERMS) {
            fill(links, Direction::Next, &href, ctx, trace, "link text");
        }
    }
    if links.previous.is_none() {
        if let Some(href) = first_text_match(doc, TEXT_PREV_TERMS) {
            fill(links, Direction::Previous, &href, ctx, trace, "link text");
        }
    }
}

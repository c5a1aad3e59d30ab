//! DOM Operations Adapter
//!
//! Thin layer over the `dom_query` crate giving the pipeline the handful of
//! tree operations it needs: parsing, text with line structure, markup size,
//! removal, and non-owning node handles.
//!
//! The parsed `Document` is an arena; a [`NodeHandle`] is an index into it and
//! never keeps the tree alive.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, Selection};

use dom_query::NodeRef;
use tendril::StrTendril;

/// Elements whose text never reaches the reader.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "title", "svg"];

/// Elements rendered on their own line(s).
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "td", "th", "ul",
];

// === Node Handles ===

/// Non-owning reference to an element of a parsed [`Document`].
///
/// Handles are plain arena indices: they are `Copy`, cannot outlive the
/// document in any meaningful way, and resolve to `None` once the node has
/// been detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(NodeId);

impl NodeHandle {
    /// Handle to the first node of a selection.
    #[must_use]
    pub fn of(sel: &Selection) -> Option<Self> {
        sel.nodes().first().map(|node| Self(node.id))
    }

    /// Resolves the handle against the document it was taken from.
    #[must_use]
    pub fn resolve<'a>(self, doc: &'a Document) -> Option<Selection<'a>> {
        let node = doc.tree.get(&self.0)?;
        // Detached nodes lose their parent; the document root has none either
        // but is never handed out as a handle.
        node.parent()?;
        Some(Selection::from(node))
    }
}

// === Parsing ===

/// Parse HTML string into document.
///
/// html5ever never rejects input; malformed markup yields a best-effort tree.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

// === Tag/Node Information ===

/// Get tag name (lowercase).
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_ascii_lowercase())
}

/// Class attribute split into tokens.
#[must_use]
pub fn class_tokens(sel: &Selection) -> Vec<String> {
    sel.attr("class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Get any attribute value.
#[inline]
#[must_use]
pub(crate) fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

// === Text Content ===

/// Raw text content of node and descendants, as the parser stores it.
#[inline]
#[must_use]
pub(crate) fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Text of a selection with block-level elements on their own lines.
///
/// Source newlines inside text nodes are kept; `<br>` and block boundaries
/// add line breaks so that `<p>a</p><p>b</p>` reads as two lines. Script and
/// style content is skipped.
#[must_use]
pub fn block_text(sel: &Selection) -> String {
    let mut out = String::new();
    for node in sel.nodes() {
        push_block_text(node, &mut out);
    }
    out
}

fn push_block_text(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() {
            let tag = child.node_name().map(|t| t.to_ascii_lowercase()).unwrap_or_default();
            if SKIPPED_TAGS.contains(&tag.as_str()) {
                continue;
            }
            if tag == "br" {
                out.push('\n');
                continue;
            }
            let is_block = BLOCK_TAGS.contains(&tag.as_str());
            if is_block {
                break_line(out);
            }
            push_block_text(&child, out);
            if is_block {
                break_line(out);
            }
        }
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Newline-separated text with every line trimmed and blank lines dropped.
#[must_use]
pub fn stripped_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Character count of a string (Unicode scalar values, not bytes).
#[inline]
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Serialized markup size of a selection in characters.
#[must_use]
pub fn markup_len(sel: &Selection) -> usize {
    char_len(&sel.html())
}

/// Page title from `<title>`, cut before the first " - " site suffix.
#[must_use]
pub fn page_title(doc: &Document) -> Option<String> {
    let title = doc.select("title");
    if !title.exists() {
        return None;
    }
    let text = title.text();
    let main = text.split(" - ").next().unwrap_or("").trim();
    if main.is_empty() {
        None
    } else {
        Some(main.to_string())
    }
}

// === Tree Manipulation ===

/// Remove every element matching `selector` below `root`.
///
/// Returns the number of removed elements.
pub fn remove_matching(root: &Selection, selector: &str) -> usize {
    let matched = root.select(selector);
    let count = matched.length();
    if count > 0 {
        matched.remove();
    }
    count
}

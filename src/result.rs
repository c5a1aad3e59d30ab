//! Result types for extraction output.
//!
//! This module defines the structured output of a chapter extraction: the
//! cleaned text, the navigation links and the decision trace.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Title used when nothing readable could be extracted.
pub const NO_CONTENT_TITLE: &str = "No content found";

/// Append-only record of the decisions the pipeline took.
///
/// The trace is diagnostic output only. Every entry is also emitted as a
/// `tracing` debug event under the `rs_chapter_extract::trace` target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleaningTrace {
    entries: Vec<String>,
}

impl CleaningTrace {
    /// Creates an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decision record.
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!(target: "rs_chapter_extract::trace", "{entry}");
        self.entries.push(entry);
    }

    /// All records in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when any record contains `needle`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.contains(needle))
    }
}

impl fmt::Display for CleaningTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join("\n"))
    }
}

/// Previous/next chapter links. Both are absolute URLs when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLinks {
    /// Link to the previous chapter.
    pub previous: Option<String>,

    /// Link to the next chapter.
    pub next: Option<String>,
}

impl NavigationLinks {
    /// True once both directions are known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.previous.is_some() && self.next.is_some()
    }
}

/// Result of extracting one chapter page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Chapter or page title.
    pub title: String,

    /// Cleaned content, paragraphs separated by a blank line.
    pub content: String,

    /// Wall time of the call, fetch included.
    pub elapsed: Duration,

    /// Decision trace of the pipeline.
    pub trace: CleaningTrace,

    /// Previous/next chapter links.
    pub navigation: NavigationLinks,
}

impl ExtractionResult {
    /// Sentinel returned when no readable content survived.
    #[must_use]
    pub fn no_content(elapsed: Duration, trace: CleaningTrace) -> Self {
        Self {
            title: NO_CONTENT_TITLE.to_string(),
            content: String::new(),
            elapsed,
            trace,
            navigation: NavigationLinks::default(),
        }
    }

    /// True for the "No content found" sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_keeps_insertion_order() {
        let mut trace = CleaningTrace::new();
        trace.push("first");
        trace.push(String::from("second"));
        assert_eq!(trace.entries(), ["first", "second"]);
        assert_eq!(trace.to_string(), "first\nsecond");
        assert!(trace.mentions("sec"));
    }

    #[test]
    fn test_trace_serializes_as_list() {
        let mut trace = CleaningTrace::new();
        trace.push("only");
        assert_eq!(serde_json::to_string(&trace).unwrap_or_default(), r#"["only"]"#);
    }

    #[test]
    fn test_sentinel_has_no_links() {
        let result = ExtractionResult::no_content(Duration::from_millis(5), CleaningTrace::new());
        assert_eq!(result.title, NO_CONTENT_TITLE);
        assert!(result.is_empty());
        assert!(!result.navigation.is_complete());
    }
}

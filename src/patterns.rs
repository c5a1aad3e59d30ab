//! Compiled regex patterns shared by the extraction pipeline.
//!
//! All patterns are compiled once on first use via `LazyLock`.
//! Patterns are organized by the stage that consumes them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Chapter Structure
// =============================================================================

/// A "Chapter N" / "Chương N" heading anywhere in a line, any case.
///
/// Lines matching this are exempt from every noise filter.
pub static CHAPTER_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(chương|chapter)\s+\d+").expect("CHAPTER_HEADING regex")
});

/// A capitalized chapter title through the end of its line, as printed on
/// chapter pages ("Chương 12: Tên chương").
pub static CHAPTER_TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Chương|Chapter)\s+\d+[^\n]*").expect("CHAPTER_TITLE_LINE regex")
});

/// Chapter marker inside a URL path (`.../chuong-12`, `.../chapter-12/`).
pub static CHAPTER_URL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(chuong|chapter)-(\d+)").expect("CHAPTER_URL_MARKER regex")
});

// =============================================================================
// Line Shapes
// =============================================================================

/// Very short lines that are still content: shouted words ("BOOM!") or bare
/// punctuation ("...", "?!").
pub static BARE_EXCLAMATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\p{Lu}+!|[!?.…]+)$").expect("BARE_EXCLAMATION regex")
});

/// Short, optionally quoted exclamations common in fiction ("Ah!", "'Hmm?'").
pub static QUOTED_EXCLAMATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^["'“”‘’]*\p{Lu}\p{Ll}*[!?.]+["'“”‘’]*$"#).expect("QUOTED_EXCLAMATION regex")
});

/// A fully quoted utterance ending in terminal punctuation ("'Đi!'").
pub static QUOTED_UTTERANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^["'“”‘’]+.*[!?.]["'“”‘’]+$"#).expect("QUOTED_UTTERANCE regex")
});

/// A quoted span, used to detect dialogue-heavy pages.
pub static DIALOGUE_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""[^"]+"|'[^']+'|“[^”]+”"#).expect("DIALOGUE_SPAN regex")
});

/// CSS hex color codes leaked from reader-settings widgets.
pub static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#[A-Fa-f0-9]{3,6}").expect("HEX_COLOR regex")
});

// =============================================================================
// Text Normalization
// =============================================================================

/// Matches runs of spaces for collapsing.
pub static MULTIPLE_SPACES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" {2,}").expect("MULTIPLE_SPACES regex")
});

/// Matches three or more consecutive newlines.
pub static MULTIPLE_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex")
});

// =============================================================================
// Character Classes
// =============================================================================

/// Markup-ish characters counted by the line filter.
pub const LINE_SPECIAL_CHARS: &[char] = &['#', '[', ']', '{', '}', '(', ')', '<', '>', '/', '\\', '|', '@'];

/// Wider symbol set counted by the deep cleaner on short lines.
pub const CLEANER_SPECIAL_CHARS: &[char] = &[
    '#', '[', ']', '{', '}', '(', ')', '<', '>', '/', '\\', '|', '@', '$', '%', '^', '&', '*', '+', '=',
];

/// Returns true when `line` contains a chapter heading.
#[inline]
#[must_use]
pub fn is_chapter_heading(line: &str) -> bool {
    CHAPTER_HEADING.is_match(line)
}

/// Share of characters of `line` drawn from `set`.
///
/// Returns 0.0 for an empty line.
#[must_use]
pub fn special_char_density(line: &str, set: &[char]) -> f64 {
    let total = line.chars().count();
    if total == 0 {
        return 0.0;
    }
    let special = line.chars().filter(|c| set.contains(c)).count();
    special as f64 / total as f64
}

/// Number of characters of `line` drawn from `set`.
#[must_use]
pub fn special_char_count(line: &str, set: &[char]) -> usize {
    line.chars().filter(|c| set.contains(c)).count()
}

/// Collapses space runs and excess blank lines, then trims.
#[must_use]
pub fn normalize_spacing(text: &str) -> String {
    let collapsed = MULTIPLE_SPACES.replace_all(text, " ");
    MULTIPLE_NEWLINES.replace_all(&collapsed, "\n\n").trim().to_string()
}

/// Number of paragraph breaks (`\n\n`) in `text`.
#[must_use]
pub fn paragraph_break_count(text: &str) -> usize {
    text.matches("\n\n").count()
}

//! Line Filter
//!
//! Drops navigation, widget and markup residue from the selected block's
//! text, one line at a time. Rules are checked in order and the first rule
//! with an opinion decides; a line no rule objects to is kept.

use crate::dom::char_len;
use crate::options::Options;
use crate::patterns::{
    is_chapter_heading, special_char_density, BARE_EXCLAMATION, LINE_SPECIAL_CHARS, QUOTED_EXCLAMATION,
};
use crate::result::CleaningTrace;

/// Whole-line UI and navigation labels, compared case-insensitively.
pub const UI_KEYWORDS: &[&str] = &[
    "<", ">", "«", "»",
    "next", "prev", "previous", "forward", "back", "home", "menu", "login", "search", "sign in",
    "chương sau", "chương trước", "trang chủ", "đăng nhập", "đăng ký", "tìm kiếm", "mục lục",
    "quay lại", "tiếp",
];

/// Lines longer than this survive the degraded fallback.
const FALLBACK_MIN_CHARS: usize = 20;

/// Outcome of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Line stays.
    Keep,
    /// Line goes.
    Drop,
}

/// A line with the context the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct LineView<'a> {
    /// Trimmed line.
    pub line: &'a str,
    /// Length of `line` in characters.
    pub len: usize,
    /// Length of the nearest non-blank line above, 0 if none.
    pub prev_len: usize,
    /// Length of the nearest non-blank line below, 0 if none.
    pub next_len: usize,
    /// Page is on a novel-flagged site.
    pub is_novel: bool,
    /// Tuning constants.
    pub options: &'a Options,
}

/// A filter rule. `None` defers to the next rule.
pub type LineRule = fn(&LineView) -> Option<Verdict>;

/// Rules in the order they are checked.
pub static LINE_RULES: &[LineRule] = &[
    blank,
    chapter_heading,
    too_short,
    novel_exclamation,
    special_char_heavy,
    few_word_chars,
    ui_keyword,
    heading_or_fragment,
];

fn blank(view: &LineView) -> Option<Verdict> {
    view.line.is_empty().then_some(Verdict::Drop)
}

fn chapter_heading(view: &LineView) -> Option<Verdict> {
    is_chapter_heading(view.line).then_some(Verdict::Keep)
}

fn too_short(view: &LineView) -> Option<Verdict> {
    (view.len < 5 && !BARE_EXCLAMATION.is_match(view.line)).then_some(Verdict::Drop)
}

fn novel_exclamation(view: &LineView) -> Option<Verdict> {
    (view.is_novel && QUOTED_EXCLAMATION.is_match(view.line)).then_some(Verdict::Keep)
}

fn special_char_heavy(view: &LineView) -> Option<Verdict> {
    (special_char_density(view.line, LINE_SPECIAL_CHARS) > view.options.line_special_char_density)
        .then_some(Verdict::Drop)
}

fn few_word_chars(view: &LineView) -> Option<Verdict> {
    let word_chars = view.line.chars().filter(|c| c.is_alphanumeric() || *c == '_').count();
    let ratio = word_chars as f64 / view.len.max(1) as f64;
    (ratio < 0.5 && view.len < 20).then_some(Verdict::Drop)
}

fn ui_keyword(view: &LineView) -> Option<Verdict> {
    let lowered = view.line.to_lowercase();
    UI_KEYWORDS.contains(&lowered.as_str()).then_some(Verdict::Drop)
}

/// Short lines between two long ones read as headings; other very short
/// lines are fragments.
fn heading_or_fragment(view: &LineView) -> Option<Verdict> {
    if view.len >= 20 {
        return None;
    }
    if view.prev_len > 50 && view.next_len > 50 {
        return Some(Verdict::Keep);
    }
    (view.len < 10).then_some(Verdict::Drop)
}

/// Decides one line.
#[must_use]
pub fn judge(view: &LineView) -> Verdict {
    LINE_RULES
        .iter()
        .find_map(|rule| rule(view))
        .unwrap_or(Verdict::Keep)
}

/// Filters block text into the lines worth keeping.
///
/// Falls back to every original line longer than 20 characters when the
/// rules leave nothing.
#[must_use]
pub fn filter_lines(text: &str, is_novel: bool, options: &Options, trace: &mut CleaningTrace) -> Vec<String> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let lengths: Vec<usize> = lines.iter().map(|l| char_len(l)).collect();

    let mut kept = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let view = LineView {
            line,
            len: lengths[i],
            prev_len: nearest_non_blank(lengths[..i].iter().rev()),
            next_len: nearest_non_blank(lengths[i + 1..].iter()),
            is_novel,
            options,
        };
        if judge(&view) == Verdict::Keep {
            kept.push((*line).to_string());
        }
    }

    let non_blank = lengths.iter().filter(|&&n| n > 0).count();
    trace.push(format!("Line filter kept {} of {} lines", kept.len(), non_blank));

    if kept.is_empty() {
        trace.push("No lines passed filtering, keeping lines longer than 20 characters");
        kept = lines
            .iter()
            .filter(|l| char_len(l) > FALLBACK_MIN_CHARS)
            .map(|l| (*l).to_string())
            .collect();
    }
    kept
}

fn nearest_non_blank<'a>(mut lengths: impl Iterator<Item = &'a usize>) -> usize {
    lengths.find(|&&n| n > 0).copied().unwrap_or(0)
}

//! Deep Cleaner
//!
//! Conservative second pass over reconstructed content. Reader-settings
//! labels are removed only when they make up a whole line; prose that merely
//! mentions them is left alone.

use crate::cleaning::{compact, guard_against_over_cleaning, is_well_formed, record_reduction, too_short_to_clean};
use crate::dom::char_len;
use crate::options::Options;
use crate::patterns::{
    is_chapter_heading, normalize_spacing, special_char_density, CLEANER_SPECIAL_CHARS, HEX_COLOR,
    QUOTED_UTTERANCE,
};
use crate::result::CleaningTrace;

/// Reader-settings labels, in compact form (lowercase, no whitespace).
pub const UI_LABELS: &[&str] = &[
    "cấuhình",
    "mụclục",
    "đánhdấu",
    "càiđặtđọctruyện",
    "close",
    "màunền",
    "màuchữ",
    "fontchữ",
    "cỡchữ",
    "chiềucaodòng",
    "canhchữ",
    "mặcđịnh",
];

/// Authentication labels, in compact form.
pub const AUTH_LABELS: &[&str] = &["đăngnhập", "đăngký", "login", "register", "signin", "signup"];

/// Substrings that mark a line as settings-widget residue in the revert fallback.
pub const REVERT_NOISE: &[&str] = &["#F8FAFC", "Màu nền [ngày]", "Màu chữ [ngày]", "Font chữAvenir Next"];

/// Lines shorter than this are subject to the symbol-density rule.
const DENSITY_MAX_LINE_CHARS: usize = 30;

/// The chapter-aware re-pass triggers when fewer lines than this survive...
const REPASS_MAX_KEPT: usize = 3;
/// ...out of more input lines than this.
const REPASS_MIN_INPUT_LINES: usize = 10;

fn is_ui_label(line: &str) -> bool {
    UI_LABELS.contains(&compact(line).as_str())
}

fn is_label_or_hex(text: &str) -> bool {
    is_ui_label(text) || HEX_COLOR.is_match(text)
}

/// Full-mode decision for one trimmed, non-blank line.
fn keep_line(line: &str, options: &Options) -> bool {
    if is_chapter_heading(line) {
        return true;
    }
    let len = char_len(line);
    if len < 5 && !QUOTED_UTTERANCE.is_match(line) {
        return false;
    }
    let compacted = compact(line);
    if UI_LABELS.contains(&compacted.as_str()) || AUTH_LABELS.contains(&compacted.as_str()) {
        return false;
    }
    if HEX_COLOR.is_match(line) {
        return false;
    }
    !(len < DENSITY_MAX_LINE_CHARS
        && special_char_density(line, CLEANER_SPECIAL_CHARS) > options.cleaner_special_char_density)
}

/// Minimal mode: drop only whole-line labels and hex codes.
fn minimal_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| is_chapter_heading(l) || !is_label_or_hex(l))
        .collect()
}

/// Revert fallback: the original minus lines holding settings-widget residue.
#[must_use]
pub fn minimal_strip(original: &str) -> String {
    original
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| is_chapter_heading(l) || !REVERT_NOISE.iter().any(|n| l.contains(n)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Runs the deep cleaner.
///
/// Content shorter than the minimum content length is returned unchanged.
#[must_use]
pub fn deep_clean(content: &str, options: &Options, trace: &mut CleaningTrace) -> String {
    if too_short_to_clean(content, options) {
        return content.to_string();
    }

    if is_well_formed(content) {
        trace.push("Content already well-structured, removing only exact labels and color codes");
        let kept: Vec<&str> = content
            .split("\n\n")
            .filter(|p| is_chapter_heading(p) || !is_label_or_hex(p.trim()))
            .collect();
        let cleaned = kept.join("\n\n");
        let cleaned = guard_against_over_cleaning(content, cleaned, options, trace, minimal_strip);
        record_reduction(trace, "Deep cleaning", content, &cleaned);
        return cleaned;
    }

    let input_lines = content.lines().count();
    let mut kept: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| keep_line(l, options))
        .collect();

    if is_chapter_heading(content) && kept.len() < REPASS_MAX_KEPT && input_lines > REPASS_MIN_INPUT_LINES {
        trace.push("Cleaning was too aggressive for a chapter, retrying with exact-label filtering");
        kept = minimal_lines(content);
    }

    let cleaned = normalize_spacing(&kept.join("\n\n"));
    let cleaned = guard_against_over_cleaning(content, cleaned, options, trace, minimal_strip);
    record_reduction(trace, "Deep cleaning", content, &cleaned);
    cleaned
}

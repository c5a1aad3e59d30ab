//! Vietnamese locale cleaner.
//!
//! Vietnamese novel readers wrap every chapter in the same settings panel,
//! chapter buttons and rating bar. Their labels leak into the text either as
//! separate lines or glued together without spaces; both shapes are removed
//! here, after which the surviving lines are regrouped into paragraphs.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

use crate::cleaning::{guard_against_over_cleaning, is_well_formed, record_reduction, too_short_to_clean};
use crate::dom::char_len;
use crate::options::Options;
use crate::paragraphs::{group_paragraphs, join_paragraphs};
use crate::patterns::{is_chapter_heading, normalize_spacing, HEX_COLOR};
use crate::result::CleaningTrace;

/// Reader chrome phrases removed when they form a whole line.
pub const NOISE_PHRASES: &[&str] = &[
    "Cấu hình",
    "Mục lục",
    "Đánh dấu",
    "Cài đặt đọc truyện",
    "Màu nền",
    "Màu chữ",
    "Font chữ",
    "Cỡ chữ",
    "Chiều cao dòng",
    "Canh chữ",
    "Canh trái",
    "Canh giữa",
    "Canh phải",
    "Canh đều",
    "Chương trước",
    "Chương sau",
    "Chấm điểm",
    "Đề cử",
    "Tặng quà",
    "Báo cáo",
    "Close",
    "Mặc định",
];

/// Whole paragraphs dropped from well-formed content, including the
/// space-less runs the settings panel renders into.
pub const PANEL_BLOCKS: &[&str] = &[
    "Cấu hình",
    "Mục lục",
    "Đánh dấu",
    "Cài đặt đọc truyện",
    "Close",
    "Màu nền",
    "Màu chữ",
    "Font chữ",
    "Cỡ chữ",
    "Chiều cao dòng",
    "Canh chữ",
    "Mặc định",
    "CấuhìnhMụclụcĐánhdấuCàiđặtđọctruyệnClose",
    "MàunềnMàuchữFontchữCỡchữChiềucaodòngCanhchữ",
];

/// Short lines matching these after lowercasing and removing spaces are noise.
static NOISE_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^(cấuhình|mụclục|đánhdấu|càiđặt|đọctruyện|màunền|màuchữ|fontchữ|cỡchữ)$")
            .expect("settings label regex"),
        Regex::new(r"^(darkmode|lightmode|fontsize|lineheight|textalign)$").expect("display mode regex"),
    ]
});

/// Pattern checks only apply to lines shorter than this.
const PATTERN_MAX_LINE_CHARS: usize = 30;

fn is_noise_line(line: &str) -> bool {
    if is_chapter_heading(line) {
        return false;
    }
    if NOISE_PHRASES.contains(&line) {
        return true;
    }
    if char_len(line) >= PATTERN_MAX_LINE_CHARS {
        return false;
    }
    let squashed = line.to_lowercase().replace(' ', "");
    NOISE_PATTERNS.iter().any(|re| re.is_match(&squashed)) || HEX_COLOR.is_match(line)
}

fn is_exact_noise(paragraph: &str) -> bool {
    NOISE_PHRASES.contains(&paragraph) || PANEL_BLOCKS.contains(&paragraph)
}

/// Revert fallback: every noise phrase and color code cut out of the
/// original, chapter headings left intact.
#[must_use]
pub fn strip_noise_phrases(original: &str) -> String {
    let stripped: Vec<String> = original
        .lines()
        .map(|line| {
            if is_chapter_heading(line) {
                return line.to_string();
            }
            let mut line = line.to_string();
            for phrase in NOISE_PHRASES {
                line = line.replace(phrase, "");
            }
            HEX_COLOR.replace_all(&line, "").into_owned()
        })
        .collect();
    normalize_spacing(&stripped.join("\n"))
}

/// Runs the Vietnamese cleaner.
///
/// Content shorter than the minimum content length is returned unchanged.
#[must_use]
pub fn clean_vietnamese(content: &str, options: &Options, trace: &mut CleaningTrace) -> String {
    if too_short_to_clean(content, options) {
        return content.to_string();
    }
    trace.push("Applying Vietnamese novel cleaning");

    if is_well_formed(content) {
        trace.push("Content already well-structured, applying minimal Vietnamese cleaning");
        let cleaned = content
            .split("\n\n")
            .filter(|p| {
                let trimmed = p.trim();
                is_chapter_heading(trimmed) || !(is_exact_noise(trimmed) || HEX_COLOR.is_match(p))
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        record_reduction(trace, "Minimal Vietnamese cleaning", content, &cleaned);
        return cleaned;
    }

    let survivors: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !is_noise_line(l))
        .map(str::to_string)
        .collect();

    let paragraphs = group_paragraphs(&survivors, true, options);
    let cleaned = join_paragraphs(&paragraphs);
    let cleaned = guard_against_over_cleaning(content, cleaned, options, trace, strip_noise_phrases);
    record_reduction(trace, "Vietnamese novel cleaning", content, &cleaned);
    cleaned
}

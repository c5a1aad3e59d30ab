//! Content cleaning passes.
//!
//! Both cleaners run on paragraph-joined text after reconstruction and are
//! total: they never fail, and each one carries a revert safeguard that
//! swaps an over-aggressive result for a minimal fallback.
//!
//! - [`deep`]: conservative, locale-neutral noise removal
//! - [`vietnamese`]: reader-chrome vocabulary of Vietnamese novel hosts

pub mod deep;
pub mod vietnamese;

pub use deep::deep_clean;
pub use vietnamese::clean_vietnamese;

use crate::dom::char_len;
use crate::options::Options;
use crate::patterns::{is_chapter_heading, paragraph_break_count};
use crate::result::CleaningTrace;

/// Content with a chapter heading, more than three paragraph breaks and
/// more than 500 characters is treated as already well formed.
const WELL_FORMED_MIN_BREAKS: usize = 3;
const WELL_FORMED_MIN_CHARS: usize = 500;

/// Whether content already looks like a clean chapter.
#[must_use]
pub fn is_well_formed(content: &str) -> bool {
    is_chapter_heading(content)
        && paragraph_break_count(content) > WELL_FORMED_MIN_BREAKS
        && char_len(content) > WELL_FORMED_MIN_CHARS
}

/// Whether a cleaner should leave `content` untouched.
#[must_use]
pub fn too_short_to_clean(content: &str, options: &Options) -> bool {
    char_len(content.trim()) < options.min_content_chars
}

/// Lowercase with all whitespace removed, for whole-line label comparison.
#[must_use]
pub fn compact(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keeps `cleaned` unless it shrank below the revert threshold of
/// `original`, in which case `fallback(original)` is returned instead.
pub fn guard_against_over_cleaning(
    original: &str,
    cleaned: String,
    options: &Options,
    trace: &mut CleaningTrace,
    fallback: impl FnOnce(&str) -> String,
) -> String {
    let Some(threshold) = options.revert_threshold(char_len(original)) else {
        return cleaned;
    };
    if (char_len(&cleaned) as f64) >= threshold {
        return cleaned;
    }

    tracing::warn!(
        original = char_len(original),
        cleaned = char_len(&cleaned),
        "cleaning too aggressive, reverting to minimal fallback"
    );
    trace.push(format!(
        "Cleaned content too short ({} of {} chars), reverting to minimal cleaning",
        char_len(&cleaned),
        char_len(original)
    ));
    fallback(original)
}

/// Records how much a pass removed.
pub fn record_reduction(trace: &mut CleaningTrace, pass: &str, before: &str, after: &str) {
    let start = char_len(before);
    let removed = start.saturating_sub(char_len(after));
    trace.push(format!(
        "{pass} removed {removed} characters ({:.1}% reduction)",
        removed as f64 / start.max(1) as f64 * 100.0
    ));
}

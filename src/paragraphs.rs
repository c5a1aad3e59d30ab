//! Paragraph Reconstructor
//!
//! Chapter pages often break prose at arbitrary points (one `<br>` per
//! visual line, or one element per sentence). This module regroups the
//! filtered lines into paragraphs with a running buffer.

use crate::dom::char_len;
use crate::options::Options;
use crate::patterns::{is_chapter_heading, normalize_spacing, DIALOGUE_SPAN};
use crate::result::CleaningTrace;

/// Quoted lines shorter than this stand alone on dialogue-heavy pages.
const DIALOGUE_LINE_MAX_CHARS: usize = 100;

/// Output shorter than this may be rescued from the raw block lines.
const RESCUE_MAX_OUTPUT_CHARS: usize = 300;

/// The rescue only applies to blocks with more non-blank lines than this.
const RESCUE_MIN_BLOCK_LINES: usize = 50;

/// Raw lines longer than this are kept by the rescue.
const RESCUE_MIN_LINE_CHARS: usize = 10;

/// Share of lines holding a quoted span.
#[must_use]
pub fn dialogue_ratio(lines: &[String]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let quoted = lines.iter().filter(|l| DIALOGUE_SPAN.is_match(l)).count();
    quoted as f64 / lines.len() as f64
}

/// Groups lines into paragraphs.
///
/// Headings and short lines stand alone, lines ending in `.`, `!` or `?`
/// close the current paragraph, and everything else accumulates. With three
/// lines or fewer every line is its own paragraph.
#[must_use]
pub fn group_paragraphs(lines: &[String], is_novel: bool, options: &Options) -> Vec<String> {
    if lines.len() <= 3 {
        return lines.to_vec();
    }

    let threshold = if is_novel {
        options.novel_paragraph_threshold
    } else {
        options.paragraph_threshold
    };
    let dialogue_heavy = dialogue_ratio(lines) > options.dialogue_heavy_ratio;

    let mut paragraphs = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let standalone = is_chapter_heading(line)
            || char_len(line) < threshold
            || (dialogue_heavy && DIALOGUE_SPAN.is_match(line) && char_len(line) < DIALOGUE_LINE_MAX_CHARS);

        if standalone {
            flush(&mut buffer, &mut paragraphs);
            paragraphs.push(line.to_string());
        } else if line.ends_with(['.', '!', '?']) {
            buffer.push(line);
            flush(&mut buffer, &mut paragraphs);
        } else {
            buffer.push(line);
        }
    }
    flush(&mut buffer, &mut paragraphs);

    paragraphs
}

fn flush(buffer: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !buffer.is_empty() {
        paragraphs.push(buffer.join(" "));
        buffer.clear();
    }
}

/// Joins paragraphs with a blank line and normalizes spacing.
#[must_use]
pub fn join_paragraphs(paragraphs: &[String]) -> String {
    normalize_spacing(&paragraphs.join("\n\n"))
}

/// Groups lines into paragraphs and renders them as text.
#[must_use]
pub fn reconstruct(lines: &[String], is_novel: bool, options: &Options, trace: &mut CleaningTrace) -> String {
    let paragraphs = group_paragraphs(lines, is_novel, options);
    trace.push(format!(
        "Reconstructed {} paragraph(s) from {} line(s)",
        paragraphs.len(),
        lines.len()
    ));
    join_paragraphs(&paragraphs)
}

/// Replaces an implausibly short reconstruction with a simple rendition of
/// the raw block.
///
/// Applies when `content` is under 300 characters although the block had
/// more than 50 non-blank lines; every raw line longer than 10 characters is
/// kept, provided that gives more than twice as many lines as `content` has
/// paragraphs.
#[must_use]
pub fn rescue_short_output(content: &str, block_text: &str, trace: &mut CleaningTrace) -> Option<String> {
    if char_len(content) >= RESCUE_MAX_OUTPUT_CHARS {
        return None;
    }
    let block_lines = block_text.lines().filter(|l| !l.trim().is_empty()).count();
    if block_lines <= RESCUE_MIN_BLOCK_LINES {
        return None;
    }

    let simple: Vec<&str> = block_text
        .lines()
        .map(str::trim)
        .filter(|l| char_len(l) > RESCUE_MIN_LINE_CHARS)
        .collect();
    let paragraphs = content.split("\n\n").filter(|p| !p.trim().is_empty()).count();

    if simple.len() > 2 * paragraphs {
        trace.push(format!(
            "Output very short for a {block_lines}-line block, using simple line extraction"
        ));
        Some(simple.join("\n\n"))
    } else {
        None
    }
}

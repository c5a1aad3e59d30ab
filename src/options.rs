//! Configuration options for chapter extraction.
//!
//! The `Options` struct carries every tuning constant used by the pipeline.
//! The defaults are the empirically chosen values the heuristics were tuned
//! with; they are exposed so callers can override them rather than having
//! them baked into each component.

use std::time::Duration;

/// Configuration options for chapter extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_chapter_extract::Options;
///
/// let options = Options {
///     novel_score_multiplier: 2.0,
///     timeout: std::time::Duration::from_secs(60),
///     ..Options::default()
/// };
/// assert_eq!(options.min_selector_block_chars, 200);
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    // === Candidate discovery ===
    /// Minimum trimmed text length for an element matched by a profiled
    /// selector (strategy A) to become a candidate.
    ///
    /// Default: `200`
    pub min_selector_block_chars: usize,

    /// A `div`/`section` must have strictly more text than this to be picked
    /// up by the dense container scan (strategy B).
    ///
    /// Default: `300`
    pub min_dense_container_chars: usize,

    /// Combined `<p>` text must exceed this for the max-paragraph strategy (C).
    ///
    /// Default: `200`
    pub min_paragraph_text_chars: usize,

    /// The largest-text fallback (D) requires strictly more text than this.
    ///
    /// Default: `200`
    pub min_largest_text_chars: usize,

    // === Scoring ===
    /// Score multiplier applied to `text_len * ratio` on novel-flagged sites.
    ///
    /// Default: `1.5`
    pub novel_score_multiplier: f64,

    /// Number of text characters per expected paragraph when computing
    /// paragraph density.
    ///
    /// Default: `500.0`
    pub paragraph_density_chars: f64,

    /// Weight of paragraph density in the paragraph score.
    ///
    /// Default: `0.5`
    pub paragraph_score_factor: f64,

    /// Upper bound of the paragraph score.
    ///
    /// Default: `2.0`
    pub paragraph_score_cap: f64,

    // === Line filter and paragraphs ===
    /// Lines whose special-character density exceeds this are dropped by the
    /// line filter.
    ///
    /// Default: `0.10`
    pub line_special_char_density: f64,

    /// Lines shorter than this stand alone as paragraphs on novel sites.
    ///
    /// Default: `15`
    pub novel_paragraph_threshold: usize,

    /// Lines shorter than this stand alone as paragraphs on other sites.
    ///
    /// Default: `25`
    pub paragraph_threshold: usize,

    /// Share of quoted lines above which a page counts as dialogue-heavy.
    ///
    /// Default: `0.3`
    pub dialogue_heavy_ratio: f64,

    // === Cleaners ===
    /// Short lines whose special-character density exceeds this are dropped
    /// by the deep cleaner.
    ///
    /// Default: `0.15`
    pub cleaner_special_char_density: f64,

    /// Cleaned output shorter than `min(revert_min_chars, revert_ratio * original)`
    /// triggers the revert safeguard.
    ///
    /// Default: `300`
    pub revert_min_chars: usize,

    /// See `revert_min_chars`.
    ///
    /// Default: `0.3`
    pub revert_ratio: f64,

    /// The revert safeguard only applies to originals longer than this.
    ///
    /// Default: `1000`
    pub revert_min_original_chars: usize,

    /// Content shorter than this after cleaning is reported as
    /// "No content found". Cleaners also pass shorter input through untouched.
    ///
    /// Default: `100`
    pub min_content_chars: usize,

    // === Fetching ===
    /// Requested page timeout. Floored at `min_timeout`, and at
    /// `slow_domain_timeout` for slow profiles.
    ///
    /// Default: `30s`
    pub timeout: Duration,

    /// Lowest timeout the engine will ever use.
    ///
    /// Default: `30s`
    pub min_timeout: Duration,

    /// Timeout floor for domains known to be slow or unstable.
    ///
    /// Default: `45s`
    pub slow_domain_timeout: Duration,

    /// Upper bound of the read timeout.
    ///
    /// Default: `30s`
    pub max_read_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_selector_block_chars: 200,
            min_dense_container_chars: 300,
            min_paragraph_text_chars: 200,
            min_largest_text_chars: 200,
            novel_score_multiplier: 1.5,
            paragraph_density_chars: 500.0,
            paragraph_score_factor: 0.5,
            paragraph_score_cap: 2.0,
            line_special_char_density: 0.10,
            novel_paragraph_threshold: 15,
            paragraph_threshold: 25,
            dialogue_heavy_ratio: 0.3,
            cleaner_special_char_density: 0.15,
            revert_min_chars: 300,
            revert_ratio: 0.3,
            revert_min_original_chars: 1000,
            min_content_chars: 100,
            timeout: Duration::from_secs(30),
            min_timeout: Duration::from_secs(30),
            slow_domain_timeout: Duration::from_secs(45),
            max_read_timeout: Duration::from_secs(30),
        }
    }
}

impl Options {
    /// Length below which a cleaning pass counts as over-aggressive for an
    /// original of `original_len` characters.
    ///
    /// Returns `None` when the original is too short for the safeguard.
    #[must_use]
    pub fn revert_threshold(&self, original_len: usize) -> Option<f64> {
        if original_len <= self.revert_min_original_chars {
            return None;
        }
        Some((self.revert_min_chars as f64).min(self.revert_ratio * original_len as f64))
    }
}

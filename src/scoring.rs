//! Block Scorer & Selector
//!
//! Ranks candidate blocks by text length, text-to-markup ratio and
//! paragraph density, and picks the winner.
//!
//! ```text
//! novel sites:  score = text_len * ratio * 1.5
//! other sites:  score = text_len * ratio * (1 + min(2.0, density * 0.5))
//! ```

use crate::discovery::ContentBlock;
use crate::options::Options;

/// Scoring mode, decided by the site profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Flat multiplier; paragraph markup is unreliable on novel readers.
    Novel,
    /// Paragraph-density bonus.
    Standard,
}

impl ScoringMode {
    /// Mode for a novel flag.
    #[must_use]
    pub fn for_novel(is_novel: bool) -> Self {
        if is_novel {
            Self::Novel
        } else {
            Self::Standard
        }
    }
}

/// Paragraph bonus of a block, capped.
#[must_use]
pub fn paragraph_score(block: &ContentBlock, options: &Options) -> f64 {
    (block.paragraph_density * options.paragraph_score_factor).min(options.paragraph_score_cap)
}

/// Score of a block. Pure function of the block's measurements.
#[must_use]
pub fn score_block(block: &ContentBlock, mode: ScoringMode, options: &Options) -> f64 {
    let base = block.text_len as f64 * block.ratio;
    match mode {
        ScoringMode::Novel => base * options.novel_score_multiplier,
        ScoringMode::Standard => base * (1.0 + paragraph_score(block, options)),
    }
}

/// Fills in every block's score.
pub fn rank(blocks: &mut [ContentBlock], mode: ScoringMode, options: &Options) {
    for block in blocks.iter_mut() {
        block.score = score_block(block, mode, options);
    }
}

/// Scores the blocks and returns the best one.
///
/// Ties keep discovery order: the earliest block with the highest score wins.
#[must_use]
pub fn select_best(mut blocks: Vec<ContentBlock>, mode: ScoringMode, options: &Options) -> Option<ContentBlock> {
    rank(&mut blocks, mode, options);

    let mut best: Option<ContentBlock> = None;
    for block in blocks {
        if best.as_ref().is_none_or(|b| block.score > b.score) {
            best = Some(block);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DiscoveryStrategy;

    fn block(text_len: usize, html_len: usize, paragraphs: usize) -> ContentBlock {
        ContentBlock::measure(
            None,
            "x".repeat(text_len),
            html_len,
            paragraphs,
            DiscoveryStrategy::Profiled,
            &Options::default(),
        )
    }

    #[test]
    fn test_novel_mode_uses_flat_multiplier() {
        let b = block(1000, 2000, 10);
        let score = score_block(&b, ScoringMode::Novel, &Options::default());
        assert!((score - 1000.0 * 0.5 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_paragraph_score_is_capped() {
        // 10 paragraphs over 1000 chars: density 5.0, bonus min(2.0, 2.5) = 2.0
        let b = block(1000, 1000, 10);
        assert!((paragraph_score(&b, &Options::default()) - 2.0).abs() < 1e-9);
        let score = score_block(&b, ScoringMode::Standard, &Options::default());
        assert!((score - 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_blocks_use_unit_density_divisor() {
        // text shorter than 500 chars divides by 1, not by a fraction
        let b = block(250, 500, 1);
        assert!((b.paragraph_density - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_select_best_prefers_dense_text() {
        let markup_heavy = block(1000, 10_000, 0);
        let clean = block(800, 1000, 4);
        let best = select_best(vec![markup_heavy, clean], ScoringMode::Standard, &Options::default())
            .expect("a block");
        assert_eq!(best.text_len, 800);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let mut first = block(500, 1000, 1);
        first.origin = DiscoveryStrategy::Profiled;
        let mut second = block(500, 1000, 1);
        second.origin = DiscoveryStrategy::DenseContainer;

        let best = select_best(vec![first, second], ScoringMode::Novel, &Options::default()).expect("a block");
        assert_eq!(best.origin, DiscoveryStrategy::Profiled);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_best(Vec::new(), ScoringMode::Novel, &Options::default()).is_none());
    }
}

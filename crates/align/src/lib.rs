//! Sentence-to-run alignment: strategy chain, candidate selection, and
//! region merging.
//!
//! The backend asserts that some sentence supports an answer; the renderer
//! fragments page text into positioned runs that respect neither word nor
//! sentence boundaries. This crate reconciles the two. Six matching
//! strategies run in fidelity order — exact containment down to an
//! individual-word fallback — with a word-order chain refinement competing
//! when none is confident. A coverage-driven selector picks the final run
//! set, and the merger folds it into screen-space regions tagged with a
//! confidence tier.
//!
//! [`align_sentence`] is the one-call path from a [`SentenceRef`] and a
//! [`RunIndex`](layout::RunIndex) to [`HighlightRegion`]s. The pieces are
//! public for callers that want to run the chain, selector, or merger
//! separately.

mod candidate;
mod chain;
mod config;
mod coverage;
mod error;
mod refine;
mod region;
mod selector;
mod sentence;
pub mod strategy;

pub use crate::candidate::{MatchCandidate, StrategyKind};
pub use crate::chain::StrategyChain;
pub use crate::config::AlignConfig;
pub use crate::coverage::{matched_positions, CoverageState};
pub use crate::error::AlignError;
pub use crate::refine::word_order_chain;
pub use crate::region::{merge, ConfidenceTier, HighlightRegion, StyleHint};
pub use crate::selector::{select, SelectedRun};
pub use crate::sentence::SentenceRef;

use layout::RunIndex;
use serde::{Deserialize, Serialize};

/// Result of aligning one sentence against one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceAlignment {
    pub sentence_id: String,
    pub regions: Vec<HighlightRegion>,
    /// Confidence of the best candidate that drove the selection.
    pub confidence: f32,
    /// Strategy that produced that candidate.
    pub strategy: StrategyKind,
}

/// Align one sentence with the standard strategy chain.
pub fn align_sentence(
    sentence: &SentenceRef,
    index: &RunIndex,
    cfg: &AlignConfig,
) -> Result<SentenceAlignment, AlignError> {
    align_sentence_with(&StrategyChain::standard(), sentence, index, cfg)
}

/// Align one sentence with a caller-owned chain, for callers resolving many
/// sentences against the same configuration.
pub fn align_sentence_with(
    chain: &StrategyChain,
    sentence: &SentenceRef,
    index: &RunIndex,
    cfg: &AlignConfig,
) -> Result<SentenceAlignment, AlignError> {
    if index.is_empty() {
        return Err(AlignError::NoRuns {
            page_number: index.page_number(),
        });
    }

    let candidates = chain.run(sentence, index, cfg);
    let best = candidates.first().ok_or_else(|| AlignError::NoMatch {
        sentence_id: sentence.id.clone(),
    })?;
    let (confidence, strategy) = (best.confidence, best.kind);

    let selected = select(&candidates, sentence, index, cfg);
    if selected.is_empty() {
        return Err(AlignError::NoMatch {
            sentence_id: sentence.id.clone(),
        });
    }

    let regions = merge(&sentence.id, &selected, index, cfg);
    Ok(SentenceAlignment {
        sentence_id: sentence.id.clone(),
        regions,
        confidence,
        strategy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::{BoundingBox, TextRun};
    use normalize::NormalizeConfig;

    fn run(idx: u32, text: &str, x: f32, y: f32, w: f32) -> TextRun {
        TextRun::new(
            idx,
            1,
            text,
            BoundingBox::new(x, y, w, 12.0),
            &NormalizeConfig::default(),
        )
    }

    #[test]
    fn exact_containment_yields_one_full_confidence_region() {
        let texts = ["The tenant", "must", "vacate", "within", "30", "days."];
        let runs = texts
            .iter()
            .enumerate()
            .map(|(i, t)| run(i as u32, t, i as f32 * 55.0, 0.0, 50.0))
            .collect();
        let index = RunIndex::new(1, runs).expect("index builds");
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let alignment =
            align_sentence(&sentence, &index, &AlignConfig::default()).expect("alignment");
        assert_eq!(alignment.strategy, StrategyKind::ExactConsecutive);
        assert_eq!(alignment.confidence, 1.0);
        assert_eq!(alignment.regions.len(), 1);
        assert_eq!(
            alignment.regions[0].source_run_indices,
            vec![0, 1, 2, 3, 4, 5]
        );
        assert_eq!(alignment.regions[0].tier, ConfidenceTier::High);
    }

    #[test]
    fn line_wrapped_sentence_yields_region_per_line() {
        let runs = vec![
            run(0, "The tenant must vacate", 0.0, 0.0, 120.0),
            run(1, "within 30 days.", 0.0, 18.0, 90.0),
        ];
        let index = RunIndex::new(1, runs).expect("index builds");
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let alignment =
            align_sentence(&sentence, &index, &AlignConfig::default()).expect("alignment");
        assert_eq!(alignment.regions.len(), 2);
        assert!(alignment.regions.iter().all(|r| r.sentence_id == "s1"));
    }

    #[test]
    fn higher_fidelity_strategy_wins_when_both_would_match() {
        // Exact containment holds, so the chain exits before fuzzy runs.
        let runs = vec![
            run(0, "The tenant must vacate", 0.0, 0.0, 120.0),
            run(1, "within 30 days.", 125.0, 0.0, 90.0),
        ];
        let index = RunIndex::new(1, runs).expect("index builds");
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let alignment =
            align_sentence(&sentence, &index, &AlignConfig::default()).expect("alignment");
        assert_eq!(alignment.strategy, StrategyKind::ExactConsecutive);
        assert_eq!(alignment.confidence, 1.0);
    }

    #[test]
    fn unmatchable_sentence_reports_no_match() {
        let runs = vec![run(0, "totally unrelated words", 0.0, 0.0, 100.0)];
        let index = RunIndex::new(1, runs).expect("index builds");
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let result = align_sentence(&sentence, &index, &AlignConfig::default());
        assert!(matches!(result, Err(AlignError::NoMatch { .. })));
    }

    #[test]
    fn empty_page_reports_no_runs() {
        let index = RunIndex::new(3, Vec::new()).expect("index builds");
        let sentence = SentenceRef::new("s1", "anything at all", &NormalizeConfig::default())
            .expect("sentence");

        let result = align_sentence(&sentence, &index, &AlignConfig::default());
        assert!(matches!(
            result,
            Err(AlignError::NoRuns { page_number: 3 })
        ));
    }
}

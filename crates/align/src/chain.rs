//! Priority execution of the strategy ladder.

use layout::RunIndex;
use tracing::debug;

use crate::candidate::{sort_candidates, MatchCandidate};
use crate::config::AlignConfig;
use crate::refine;
use crate::sentence::SentenceRef;
use crate::strategy::{
    ExactConsecutive, FuzzyLine, KeywordCluster, PartialSubsequence, SlidingWindow, Strategy,
    WordFallback,
};

/// Ordered set of matching strategies.
///
/// Strategies run in priority order until one produces a candidate at or
/// above the early-exit confidence. Otherwise every strategy contributes,
/// the word-order refinement adds its chain, and the pooled candidates are
/// returned ranked — the best of them may still be a weak partial, which the
/// selector and tiering downstream treat accordingly.
pub struct StrategyChain {
    strategies: Vec<Box<dyn Strategy>>,
}

impl StrategyChain {
    /// The standard ladder, highest fidelity first.
    pub fn standard() -> Self {
        Self {
            strategies: vec![
                Box::new(ExactConsecutive),
                Box::new(FuzzyLine),
                Box::new(SlidingWindow),
                Box::new(KeywordCluster),
                Box::new(PartialSubsequence),
                Box::new(WordFallback),
            ],
        }
    }

    /// A chain with a custom strategy set, e.g. for tests or tuning runs.
    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    /// Ranked candidates for one sentence against one page.
    pub fn run(
        &self,
        sentence: &SentenceRef,
        index: &RunIndex,
        cfg: &AlignConfig,
    ) -> Vec<MatchCandidate> {
        let mut pooled: Vec<MatchCandidate> = Vec::new();

        for strategy in &self.strategies {
            let mut found = strategy.propose(sentence, index, cfg);
            sort_candidates(&mut found);
            let confident = found
                .first()
                .is_some_and(|c| c.confidence >= cfg.early_exit_confidence);
            pooled.extend(found);
            if confident {
                debug!(
                    sentence_id = %sentence.id,
                    strategy = strategy.kind().as_str(),
                    "strategy chain early exit"
                );
                sort_candidates(&mut pooled);
                return pooled;
            }
        }

        // No strategy was confident on its own; let the word-order chain
        // compete with whatever partials accumulated.
        if let Some(chained) = refine::word_order_chain(sentence, index, cfg) {
            debug!(
                sentence_id = %sentence.id,
                confidence = chained.confidence,
                "word-order refinement candidate"
            );
            pooled.push(chained);
        }

        sort_candidates(&mut pooled);
        pooled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::StrategyKind;
    use layout::{BoundingBox, TextRun};
    use normalize::NormalizeConfig;

    fn page(texts: &[&str]) -> RunIndex {
        let cfg = NormalizeConfig::default();
        let runs = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                TextRun::new(
                    i as u32,
                    1,
                    *t,
                    BoundingBox::new(i as f32 * 60.0, 0.0, 55.0, 10.0),
                    &cfg,
                )
            })
            .collect();
        RunIndex::new(1, runs).expect("index builds")
    }

    #[test]
    fn exact_match_exits_early_with_full_confidence() {
        let index = page(&["The tenant", "must", "vacate", "within", "30", "days."]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates =
            StrategyChain::standard().run(&sentence, &index, &AlignConfig::default());
        let best = candidates.first().expect("candidate");
        assert_eq!(best.kind, StrategyKind::ExactConsecutive);
        assert_eq!(best.confidence, 1.0);
    }

    #[test]
    fn artifact_page_falls_through_to_fuzzy() {
        let index = page(&["The tenant must vacte", "within 30 days."]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates =
            StrategyChain::standard().run(&sentence, &index, &AlignConfig::default());
        let best = candidates.first().expect("candidate");
        assert!(best.confidence < 1.0);
        assert!(best.confidence >= 0.6);
    }

    #[test]
    fn hopeless_page_yields_no_candidates() {
        let index = page(&["alpha beta", "gamma delta", "epsilon zeta"]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates =
            StrategyChain::standard().run(&sentence, &index, &AlignConfig::default());
        assert!(candidates.is_empty());
    }
}

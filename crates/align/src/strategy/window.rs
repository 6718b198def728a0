use std::collections::HashSet;

use layout::RunIndex;

use crate::candidate::{group_token_set, jaccard, sort_candidates, MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::sentence::SentenceRef;
use crate::strategy::Strategy;

/// Fixed-size windows slid across the full document order.
///
/// Coarser than the line-scoped pass: no layout awareness, just every
/// window of the configured sizes. Catches sentences spread over runs whose
/// line grouping is unreliable (rotated scans, ragged OCR baselines).
pub struct SlidingWindow;

impl Strategy for SlidingWindow {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SlidingWindow
    }

    fn propose(
        &self,
        sentence: &SentenceRef,
        index: &RunIndex,
        cfg: &AlignConfig,
    ) -> Vec<MatchCandidate> {
        let runs = index.runs();
        let sent_len = sentence.len();
        if runs.is_empty() || sent_len == 0 {
            return Vec::new();
        }
        let sent_set: HashSet<&str> = sentence.tokens.iter().map(String::as_str).collect();

        let mut candidates = Vec::new();
        let mut seen_spans: HashSet<(usize, usize)> = HashSet::new();

        for &size in &cfg.window_sizes {
            let size = size.min(runs.len());
            if size == 0 {
                continue;
            }
            for start in 0..=(runs.len() - size) {
                if !seen_spans.insert((start, size)) {
                    continue;
                }
                let window = &runs[start..start + size];
                let window_set = group_token_set(window.iter());
                let sim = jaccard(&window_set, &sent_set);
                if sim < cfg.window_accept {
                    continue;
                }
                let indices: Vec<u32> = window.iter().map(|r| r.stable_index).collect();
                let matched = sent_set.intersection(&window_set).count();
                candidates.push(MatchCandidate::new(
                    indices,
                    sim * cfg.window_scale,
                    StrategyKind::SlidingWindow,
                    matched,
                ));
            }
        }

        sort_candidates(&mut candidates);
        candidates.truncate(cfg.max_candidates_per_strategy);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn finds_sentence_inside_larger_page() {
        let index = page(&[
            "Section 4.",
            "Obligations on termination.",
            "The tenant",
            "must vacate",
            "within 30 days.",
            "Deposit returns",
            "are governed by §6.",
        ]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates = SlidingWindow.propose(&sentence, &index, &AlignConfig::default());
        let best = candidates.first().expect("candidate");
        assert!(best.confidence >= 0.5 * 0.9);
        assert!(best.run_indices.contains(&2));
        assert!(best.run_indices.contains(&4));
    }

    #[test]
    fn page_smaller_than_every_window_size_still_scanned() {
        let index = page(&["The tenant", "must vacate within 30 days."]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates = SlidingWindow.propose(&sentence, &index, &AlignConfig::default());
        assert!(!candidates.is_empty());
        assert_eq!(candidates[0].run_indices, vec![0, 1]);
    }
}

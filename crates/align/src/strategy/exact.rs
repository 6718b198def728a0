use std::collections::HashSet;

use layout::RunIndex;

use crate::candidate::{sort_candidates, MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::sentence::SentenceRef;
use crate::strategy::Strategy;

/// Highest-fidelity strategy: the sentence's normalized tokens appear as a
/// contiguous subsequence of a consecutive run window's concatenated tokens.
///
/// Confidence is 1.0 on containment. When no window contains the sentence,
/// the best window by token-overlap ratio is emitted instead (above a
/// configurable floor), so a near-miss still reaches the selector with an
/// honest score.
pub struct ExactConsecutive;

impl Strategy for ExactConsecutive {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ExactConsecutive
    }

    fn propose(
        &self,
        sentence: &SentenceRef,
        index: &RunIndex,
        cfg: &AlignConfig,
    ) -> Vec<MatchCandidate> {
        let runs = index.runs();
        let sent = &sentence.tokens;
        let sent_len = sent.len();
        if runs.is_empty() || sent_len == 0 {
            return Vec::new();
        }
        let sent_set: HashSet<&str> = sent.iter().map(String::as_str).collect();

        let mut exact: Vec<MatchCandidate> = Vec::new();
        let mut best_partial: Option<MatchCandidate> = None;

        for start in 0..runs.len() {
            // Leading extras can only come from the start run, so the window
            // token budget is the sentence length plus that run's length.
            let budget = sent_len + runs[start].token_count();
            let mut window_tokens: Vec<&str> = Vec::with_capacity(budget);
            // Token offset -> position of the run that contributed it.
            let mut owner: Vec<usize> = Vec::with_capacity(budget);
            let mut end = start;
            let mut partial_scored = false;
            while end < runs.len() && window_tokens.len() < budget {
                for t in &runs[end].tokens {
                    window_tokens.push(t.as_str());
                    owner.push(end);
                }
                end += 1;

                if window_tokens.len() < sent_len {
                    continue;
                }

                if let Some(offset) = find_contiguous(&window_tokens, sent) {
                    let first = owner[offset];
                    let last = owner[offset + sent_len - 1];
                    let indices: Vec<u32> =
                        (first..=last).map(|pos| runs[pos].stable_index).collect();
                    exact.push(MatchCandidate::new(
                        indices,
                        1.0,
                        StrategyKind::ExactConsecutive,
                        sent_len,
                    ));
                    break;
                }

                // First window reaching sentence length without containment:
                // score it once as the overlap fallback, then keep growing in
                // case the sentence starts mid-run and needs the budget.
                if !partial_scored {
                    partial_scored = true;
                    let window_set: HashSet<&str> = window_tokens.iter().copied().collect();
                    let matched = sent_set.intersection(&window_set).count();
                    let ratio = matched as f32 / sent_len as f32;
                    if ratio >= cfg.exact_partial_floor {
                        // A full token-set overlap without contiguity is
                        // still not containment; keep it below 1.0.
                        let confidence = ratio.min(0.95);
                        let indices: Vec<u32> =
                            (start..end).map(|pos| runs[pos].stable_index).collect();
                        let candidate = MatchCandidate::new(
                            indices,
                            confidence,
                            StrategyKind::ExactConsecutive,
                            matched,
                        );
                        let better = best_partial
                            .as_ref()
                            .map(|b| candidate.confidence > b.confidence)
                            .unwrap_or(true);
                        if better {
                            best_partial = Some(candidate);
                        }
                    }
                }
            }
        }

        let mut out = if exact.is_empty() {
            best_partial.into_iter().collect()
        } else {
            exact
        };
        sort_candidates(&mut out);
        out.truncate(cfg.max_candidates_per_strategy);
        out
    }
}

/// Offset of `needle` as a contiguous subsequence of `hay`, if any.
fn find_contiguous(hay: &[&str], needle: &[String]) -> Option<usize> {
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    hay.windows(needle.len())
        .position(|w| w.iter().zip(needle).all(|(h, n)| *h == n.as_str()))
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
    fn exact_containment_spans_the_runs() {
        let index = page(&["The tenant", "must", "vacate", "within", "30", "days."]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates =
            ExactConsecutive.propose(&sentence, &index, &AlignConfig::default());
        let best = candidates.first().expect("candidate");
        assert_eq!(best.confidence, 1.0);
        assert_eq!(best.run_indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(best.matched_token_count, sentence.len());
    }

    #[test]
    fn containment_with_boundary_extras_still_exact() {
        let index = page(&["Notice period. The tenant", "must vacate", "within 30 days. See §4"]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates =
            ExactConsecutive.propose(&sentence, &index, &AlignConfig::default());
        let best = candidates.first().expect("candidate");
        assert_eq!(best.confidence, 1.0);
        assert_eq!(best.run_indices, vec![0, 1, 2]);
    }

    #[test]
    fn spelling_artifact_breaks_exactness() {
        // "vacte" instead of "vacate": containment fails, overlap fallback
        // emits a sub-1.0 candidate.
        let index = page(&["The tenant", "must", "vacte", "within", "30", "days."]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates =
            ExactConsecutive.propose(&sentence, &index, &AlignConfig::default());
        let best = candidates.first().expect("candidate");
        assert!(best.confidence < 1.0);
        assert!(best.confidence >= 0.5);
    }

    #[test]
    fn unrelated_page_yields_nothing() {
        let index = page(&["completely", "different", "content", "about", "other", "matters"]);
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &NormalizeConfig::default(),
        )
        .expect("sentence");

        let candidates =
            ExactConsecutive.propose(&sentence, &index, &AlignConfig::default());
        assert!(candidates.is_empty());
    }
}

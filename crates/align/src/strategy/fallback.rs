use std::collections::HashSet;

use layout::RunIndex;

use crate::candidate::{group_token_set, jaccard, sort_candidates, MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::sentence::SentenceRef;
use crate::strategy::Strategy;

/// Individual-word fallback: the last rung of the ladder.
///
/// Any run sharing a meaningful fraction of its tokens with the sentence
/// joins a pool; pooled runs are grouped by index adjacency or same-line
/// spatial adjacency, and groups are scored as wholes. Low scale factor:
/// by the time this fires, nothing order-aware worked.
pub struct WordFallback;

impl Strategy for WordFallback {
    fn kind(&self) -> StrategyKind {
        StrategyKind::WordFallback
    }

    fn propose(
        &self,
        sentence: &SentenceRef,
        index: &RunIndex,
        cfg: &AlignConfig,
    ) -> Vec<MatchCandidate> {
        let runs = index.runs();
        if runs.is_empty() || sentence.is_empty() {
            return Vec::new();
        }
        let sent_set: HashSet<&str> = sentence.tokens.iter().map(String::as_str).collect();

        let pool: Vec<usize> = (0..runs.len())
            .filter(|&pos| {
                let run = &runs[pos];
                if run.tokens.is_empty() {
                    return false;
                }
                let hits = run
                    .tokens
                    .iter()
                    .filter(|t| sent_set.contains(t.as_str()))
                    .count();
                hits as f32 / run.token_count() as f32 > cfg.fallback_run_overlap
            })
            .collect();
        if pool.is_empty() {
            return Vec::new();
        }

        // Walk the pool in document order, splitting whenever neither index
        // adjacency nor same-line spatial adjacency holds.
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for pos in pool {
            let extend = groups.last().and_then(|g| g.last()).is_some_and(|&prev| {
                if runs[pos].stable_index == runs[prev].stable_index + 1 {
                    return true;
                }
                let a = &runs[prev].bbox;
                let b = &runs[pos].bbox;
                let same_line =
                    (a.center_y() - b.center_y()).abs() <= cfg.fallback_line_tolerance;
                same_line && a.horizontal_gap(b) <= cfg.fallback_max_gap
            });
            if extend {
                if let Some(group) = groups.last_mut() {
                    group.push(pos);
                }
            } else {
                groups.push(vec![pos]);
            }
        }

        let mut candidates = Vec::new();
        for group in groups {
            let group_set = group_token_set(group.iter().map(|&pos| &runs[pos]));
            let sim = jaccard(&group_set, &sent_set);
            if sim < cfg.fallback_accept {
                continue;
            }
            let indices: Vec<u32> = group.iter().map(|&pos| runs[pos].stable_index).collect();
            let matched = sent_set.intersection(&group_set).count();
            candidates.push(MatchCandidate::new(
                indices,
                sim * cfg.fallback_scale,
                StrategyKind::WordFallback,
                matched,
            ));
        }

        sort_candidates(&mut candidates);
        candidates.truncate(cfg.max_candidates_per_strategy);
        candidates
    }
}

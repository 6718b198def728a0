use layout::RunIndex;

use crate::candidate::{sort_candidates, MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::sentence::SentenceRef;
use crate::strategy::Strategy;

/// Order-preserving partial subsequence search.
///
/// Finds the longest common subsequence between the sentence and a run
/// window's concatenated tokens. Tolerates insertions on both sides (page
/// numbers, dropped words, interleaved fragments) as long as enough of the
/// sentence survives in order — at least `subsequence_min_fraction` of it.
pub struct PartialSubsequence;

impl Strategy for PartialSubsequence {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PartialSubsequence
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
        let min_len = ((sent_len as f32 * cfg.subsequence_min_fraction).ceil() as usize).max(1);

        let mut candidates = Vec::new();
        let mut seen_spans = std::collections::HashSet::new();

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
                let window_tokens: Vec<&str> = window
                    .iter()
                    .flat_map(|r| r.tokens.iter().map(String::as_str))
                    .collect();
                let lcs = lcs_len(&sentence.tokens, &window_tokens);
                if lcs < min_len {
                    continue;
                }
                let sim = lcs as f32 / sent_len as f32;
                if sim < cfg.subsequence_accept {
                    continue;
                }
                let indices: Vec<u32> = window.iter().map(|r| r.stable_index).collect();
                candidates.push(MatchCandidate::new(
                    indices,
                    sim * cfg.subsequence_scale,
                    StrategyKind::PartialSubsequence,
                    lcs,
                ));
            }
        }

        sort_candidates(&mut candidates);
        candidates.truncate(cfg.max_candidates_per_strategy);
        candidates
    }
}

/// Longest common subsequence length, rolling single row.
fn lcs_len(a: &[String], b: &[&str]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for at in a {
        for (j, bt) in b.iter().enumerate() {
            curr[j + 1] = if at == bt {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

use std::collections::HashSet;

use layout::RunIndex;

use crate::candidate::{jaccard, sort_candidates, MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::sentence::SentenceRef;
use crate::strategy::Strategy;

/// Line-scoped fuzzy matching.
///
/// Runs are grouped into visual lines first, and windows slide over the
/// resulting reading order, so a sentence wrapped across lines is compared
/// against visually consecutive runs even when the renderer's document order
/// and the visual order disagree. Similarity is token Jaccard, which
/// tolerates OCR artifacts and fragment-boundary noise that break exact
/// containment.
pub struct FuzzyLine;

impl Strategy for FuzzyLine {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FuzzyLine
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
        let order = index.reading_order(cfg.line_tolerance);
        // Windows larger than twice the sentence dilute Jaccard below any
        // useful signal.
        let token_cap = sent_len * 2;

        let mut candidates = Vec::new();
        for start in 0..order.len() {
            let mut window_set: HashSet<&str> = HashSet::new();
            let mut token_count = 0usize;
            let mut best: Option<(f32, usize)> = None;

            for (offset, &pos) in order[start..].iter().enumerate() {
                let run = &runs[pos];
                token_count += run.token_count();
                if offset > 0 && token_count > token_cap {
                    break;
                }
                window_set.extend(run.tokens.iter().map(String::as_str));

                let sim = jaccard(&window_set, &sent_set);
                if sim >= cfg.fuzzy_accept {
                    let better = best.map(|(s, _)| sim > s).unwrap_or(true);
                    if better {
                        best = Some((sim, offset));
                    }
                }
            }

            if let Some((sim, end_offset)) = best {
                let indices: Vec<u32> = order[start..=start + end_offset]
                    .iter()
                    .map(|&pos| runs[pos].stable_index)
                    .collect();
                let matched = (sim * sent_len as f32).round() as usize;
                candidates.push(MatchCandidate::new(
                    indices,
                    sim * cfg.fuzzy_scale,
                    StrategyKind::FuzzyLine,
                    matched.min(sent_len),
                ));
            }
        }

        sort_candidates(&mut candidates);
        candidates.truncate(cfg.max_candidates_per_strategy);
        candidates
    }
}

//! Coverage-driven candidate selection.
//!
//! The chain hands back ranked candidates; this module decides which runs
//! actually get highlighted. A single dominant candidate is taken as-is.
//! When several partial candidates survive, their runs are walked in reading
//! order against a [`CoverageState`], and each run must earn its place:
//! trusted origin, anchor status, or enough new coverage. Runs below the
//! diminishing-returns floor never get in.

use std::collections::HashMap;

use layout::RunIndex;
use tracing::debug;

use crate::candidate::{sort_candidates, MatchCandidate};
use crate::config::AlignConfig;
use crate::coverage::{matched_positions, CoverageState};
use crate::sentence::SentenceRef;

/// A run accepted for highlighting, tagged with the confidence of the
/// candidate that proposed it. Tier derivation downstream reads this
/// confidence, not a recomputed one.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRun {
    pub stable_index: u32,
    pub confidence: f32,
}

/// Pick the final run set for one sentence from the chain's candidates.
///
/// Candidates are first accepted greedily by descending confidence,
/// rejecting any that shares a run with an already-accepted candidate. If
/// exactly one candidate survives, its runs are the answer. Otherwise the
/// accepted candidates' runs are re-judged by the coverage walk.
pub fn select(
    candidates: &[MatchCandidate],
    sentence: &SentenceRef,
    index: &RunIndex,
    cfg: &AlignConfig,
) -> Vec<SelectedRun> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut ranked = candidates.to_vec();
    sort_candidates(&mut ranked);

    let mut accepted: Vec<&MatchCandidate> = Vec::new();
    for candidate in &ranked {
        if accepted.iter().any(|a| a.overlaps(candidate)) {
            continue;
        }
        accepted.push(candidate);
    }

    if accepted.len() == 1 {
        let candidate = accepted[0];
        return candidate
            .run_indices
            .iter()
            .filter(|&&si| index.run_at(si).is_some())
            .map(|&si| SelectedRun {
                stable_index: si,
                confidence: candidate.confidence,
            })
            .collect();
    }

    coverage_walk(&accepted, sentence, index, cfg)
}

/// Walk the pooled runs in reading order, admitting a run when any
/// acceptance rule holds and skipping everything below the
/// diminishing-returns floor. Stops once coverage is excellent and enough
/// runs are in.
fn coverage_walk(
    accepted: &[&MatchCandidate],
    sentence: &SentenceRef,
    index: &RunIndex,
    cfg: &AlignConfig,
) -> Vec<SelectedRun> {
    // Each pooled run inherits the best confidence among the candidates
    // that nominated it.
    let mut origin: HashMap<u32, f32> = HashMap::new();
    for candidate in accepted {
        for &si in &candidate.run_indices {
            let entry = origin.entry(si).or_insert(candidate.confidence);
            if candidate.confidence > *entry {
                *entry = candidate.confidence;
            }
        }
    }

    let runs = index.runs();
    let mut coverage = CoverageState::new(sentence.len());
    let mut selected: Vec<SelectedRun> = Vec::new();

    for pos in index.reading_order(cfg.line_tolerance) {
        let run = &runs[pos];
        let Some(&confidence) = origin.get(&run.stable_index) else {
            continue;
        };

        let positions = matched_positions(run, sentence);
        let gain = coverage.gain_of(&positions);
        if gain < cfg.min_new_coverage {
            debug!(
                sentence_id = %sentence.id,
                stable_index = run.stable_index,
                gain,
                "run below diminishing-returns floor, skipped"
            );
            continue;
        }

        let is_anchor = positions.contains(&0) || positions.contains(&(sentence.len() - 1));
        let trusted = confidence >= cfg.selector_min_confidence
            && coverage.fraction() < cfg.coverage_excellent;
        let solo = gain >= cfg.solo_new_coverage;
        let needy = coverage.fraction() < cfg.coverage_good;

        if trusted || is_anchor || solo || needy {
            coverage.admit(&positions);
            selected.push(SelectedRun {
                stable_index: run.stable_index,
                confidence,
            });
            if coverage.fraction() >= cfg.coverage_excellent
                && selected.len() >= cfg.early_stop_min_runs
            {
                break;
            }
        }
    }

    selected
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
                    BoundingBox::new((i % 4) as f32 * 70.0, (i / 4) as f32 * 16.0, 65.0, 12.0),
                    &cfg,
                )
            })
            .collect();
        RunIndex::new(1, runs).expect("index builds")
    }

    fn sentence(text: &str) -> SentenceRef {
        SentenceRef::new("s1", text, &NormalizeConfig::default()).expect("sentence builds")
    }

    #[test]
    fn single_candidate_returns_its_runs_verbatim() {
        let index = page(&["The tenant", "must vacate", "within 30 days."]);
        let s = sentence("The tenant must vacate within 30 days.");
        let candidate =
            MatchCandidate::new(vec![0, 1, 2], 1.0, StrategyKind::ExactConsecutive, 7);

        let selected = select(&[candidate], &s, &index, &AlignConfig::default());
        let indices: Vec<u32> = selected.iter().map(|r| r.stable_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(selected.iter().all(|r| r.confidence == 1.0));
    }

    #[test]
    fn overlapping_weaker_candidate_dropped_by_greedy_pass() {
        let index = page(&["The tenant", "must vacate", "within 30 days."]);
        let s = sentence("The tenant must vacate within 30 days.");
        let strong = MatchCandidate::new(vec![0, 1, 2], 0.9, StrategyKind::FuzzyLine, 7);
        // Shares run 2 with the strong candidate.
        let weak = MatchCandidate::new(vec![2], 0.4, StrategyKind::WordFallback, 2);

        let selected = select(&[weak, strong], &s, &index, &AlignConfig::default());
        let indices: Vec<u32> = selected.iter().map(|r| r.stable_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn coverage_walk_skips_diminishing_returns() {
        let index = page(&[
            "The tenant must vacate",
            "within 30 days.",
            // Pure repeats of already-covered tokens.
            "tenant tenant tenant",
        ]);
        let s = sentence("The tenant must vacate within 30 days.");
        let a = MatchCandidate::new(vec![0], 0.7, StrategyKind::FuzzyLine, 4);
        let b = MatchCandidate::new(vec![1], 0.7, StrategyKind::FuzzyLine, 3);
        let c = MatchCandidate::new(vec![2], 0.65, StrategyKind::WordFallback, 1);

        let selected = select(&[a, b, c], &s, &index, &AlignConfig::default());
        let indices: Vec<u32> = selected.iter().map(|r| r.stable_index).collect();
        // Run 2 explains nothing new and never gets in.
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn coverage_walk_is_monotone_and_reading_ordered() {
        let index = page(&[
            "The tenant",
            "must vacate",
            "within 30",
            "days.",
            "unrelated words here",
        ]);
        let s = sentence("The tenant must vacate within 30 days.");
        let candidates: Vec<MatchCandidate> = (0..4)
            .map(|i| MatchCandidate::new(vec![i], 0.65, StrategyKind::WordFallback, 2))
            .collect();

        let mut coverage = CoverageState::new(s.len());
        let selected = select(&candidates, &s, &index, &AlignConfig::default());
        let mut last = 0.0;
        for run in &selected {
            let r = index.run_at(run.stable_index).expect("run exists");
            coverage.admit(&matched_positions(r, &s));
            assert!(coverage.fraction() >= last);
            last = coverage.fraction();
        }
        assert!(last >= 0.8);
        // Early stop: coverage crossed the excellent threshold at the third
        // run, so the fourth is never reached.
        let indices: Vec<u32> = selected.iter().map(|r| r.stable_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_candidates_select_nothing() {
        let index = page(&["anything"]);
        let s = sentence("The tenant must vacate within 30 days.");
        assert!(select(&[], &s, &index, &AlignConfig::default()).is_empty());
    }
}

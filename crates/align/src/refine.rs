//! Word-order chain refinement.
//!
//! Runs the strategies can't assemble into a confident window may still
//! trace the sentence through the page: runs holding the sentence's first or
//! last token anchor a chain, and spatially near runs that explain new
//! sentence positions extend it. The chain is scored on coverage, word-order
//! consistency, anchor presence, and completeness, and competes with the
//! strategies' own candidates.

use layout::RunIndex;

use crate::candidate::{MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::coverage::{matched_positions, CoverageState};
use crate::sentence::SentenceRef;

struct RunMatch {
    pos: usize,
    positions: Vec<usize>,
    has_first: bool,
    has_last: bool,
}

/// Grow anchored chains and return the best one as a candidate, if any.
pub fn word_order_chain(
    sentence: &SentenceRef,
    index: &RunIndex,
    cfg: &AlignConfig,
) -> Option<MatchCandidate> {
    let runs = index.runs();
    let sent_len = sentence.len();
    if runs.is_empty() || sent_len == 0 {
        return None;
    }

    let matches: Vec<RunMatch> = (0..runs.len())
        .filter_map(|pos| {
            let positions = matched_positions(&runs[pos], sentence);
            if positions.is_empty() {
                return None;
            }
            let has_first = positions.contains(&0);
            let has_last = positions.contains(&(sent_len - 1));
            Some(RunMatch {
                pos,
                positions,
                has_first,
                has_last,
            })
        })
        .collect();

    // Chains grow from anchors only; a page without either sentence
    // endpoint has nothing to anchor order against.
    let anchors: Vec<usize> = matches
        .iter()
        .enumerate()
        .filter(|(_, m)| m.has_first || m.has_last)
        .map(|(i, _)| i)
        .collect();
    if anchors.is_empty() {
        return None;
    }

    let reading = reading_rank(index, cfg);
    let mut best: Option<(f32, Vec<usize>, usize)> = None;

    for &seed in &anchors {
        let (score, chain_members, covered) = grow_chain(seed, &matches, runs, &reading, sentence, cfg);
        let better = best.as_ref().map(|(s, _, _)| score > *s).unwrap_or(true);
        if better {
            best = Some((score, chain_members, covered));
        }
    }

    let (score, members, covered) = best?;
    let indices: Vec<u32> = members
        .iter()
        .map(|&i| runs[matches[i].pos].stable_index)
        .collect();
    Some(MatchCandidate::new(
        indices,
        score,
        StrategyKind::WordOrderChain,
        covered,
    ))
}

fn grow_chain(
    seed: usize,
    matches: &[RunMatch],
    runs: &[layout::TextRun],
    reading: &[usize],
    sentence: &SentenceRef,
    cfg: &AlignConfig,
) -> (f32, Vec<usize>, usize) {
    let mut chain = vec![seed];
    let mut coverage = CoverageState::new(sentence.len());
    coverage.admit(&matches[seed].positions);

    loop {
        let mut extension: Option<(f32, f32, usize)> = None;
        for (i, m) in matches.iter().enumerate() {
            if chain.contains(&i) {
                continue;
            }
            let gain = coverage.gain_of(&m.positions);
            if gain <= 0.0 {
                continue;
            }
            let dist = chain
                .iter()
                .map(|&c| runs[matches[c].pos].bbox.center_distance(&runs[m.pos].bbox))
                .fold(f32::INFINITY, f32::min);
            if dist > cfg.chain_reach {
                continue;
            }
            let better = extension
                .map(|(g, d, _)| gain > g || (gain == g && dist < d))
                .unwrap_or(true);
            if better {
                extension = Some((gain, dist, i));
            }
        }
        match extension {
            Some((_, _, i)) => {
                coverage.admit(&matches[i].positions);
                chain.push(i);
            }
            None => break,
        }
    }

    let cov = coverage.fraction();
    let order = order_consistency(&chain, matches, reading);
    let has_first = chain.iter().any(|&i| matches[i].has_first);
    let has_last = chain.iter().any(|&i| matches[i].has_last);
    let anchor = 0.5 * f32::from(has_first) + 0.5 * f32::from(has_last);
    let completeness = f32::from(cov >= cfg.chain_completeness_coverage);
    let score = 0.4 * cov + 0.3 * order + 0.2 * anchor + 0.1 * completeness;

    (score, chain, coverage.covered_count())
}

/// Fraction of adjacent chain pairs (in reading order) whose representative
/// sentence positions increase. Single-run chains are trivially consistent.
fn order_consistency(chain: &[usize], matches: &[RunMatch], reading: &[usize]) -> f32 {
    if chain.len() < 2 {
        return 1.0;
    }
    let mut ordered: Vec<&RunMatch> = chain.iter().map(|&i| &matches[i]).collect();
    ordered.sort_by_key(|m| reading[m.pos]);

    let reps: Vec<f32> = ordered
        .iter()
        .map(|m| {
            // Median matched position keeps one stray repeated token from
            // dragging the representative.
            let p = &m.positions;
            p[p.len() / 2] as f32
        })
        .collect();
    let increasing = reps.windows(2).filter(|w| w[1] > w[0]).count();
    increasing as f32 / (reps.len() - 1) as f32
}

/// Reading-order rank per document position.
fn reading_rank(index: &RunIndex, cfg: &AlignConfig) -> Vec<usize> {
    let order = index.reading_order(cfg.line_tolerance);
    let mut rank = vec![0usize; order.len()];
    for (r, &pos) in order.iter().enumerate() {
        rank[pos] = r;
    }
    rank
}

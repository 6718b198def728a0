use std::collections::HashSet;

use layout::TextRun;
use serde::{Deserialize, Serialize};

/// Which strategy produced a candidate. Confidence values are calibrated to
/// be comparable across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    ExactConsecutive,
    FuzzyLine,
    SlidingWindow,
    KeywordCluster,
    PartialSubsequence,
    WordFallback,
    WordOrderChain,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::ExactConsecutive => "exact_consecutive",
            StrategyKind::FuzzyLine => "fuzzy_line",
            StrategyKind::SlidingWindow => "sliding_window",
            StrategyKind::KeywordCluster => "keyword_cluster",
            StrategyKind::PartialSubsequence => "partial_subsequence",
            StrategyKind::WordFallback => "word_fallback",
            StrategyKind::WordOrderChain => "word_order_chain",
        }
    }
}

/// One strategy's proposal: a set of runs asserted to display the sentence.
///
/// `run_indices` holds stable indices in ascending order. For consecutive
/// strategies that is also visual order; clustering strategies may select
/// non-contiguous runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub run_indices: Vec<u32>,
    pub confidence: f32,
    pub kind: StrategyKind,
    pub matched_token_count: usize,
}

impl MatchCandidate {
    pub fn new(
        mut run_indices: Vec<u32>,
        confidence: f32,
        kind: StrategyKind,
        matched_token_count: usize,
    ) -> Self {
        run_indices.sort_unstable();
        run_indices.dedup();
        Self {
            run_indices,
            confidence: confidence.clamp(0.0, 1.0),
            kind,
            matched_token_count,
        }
    }

    pub fn overlaps(&self, other: &MatchCandidate) -> bool {
        // Both sides are sorted; a merge walk avoids building sets.
        let (mut i, mut j) = (0, 0);
        while i < self.run_indices.len() && j < other.run_indices.len() {
            match self.run_indices[i].cmp(&other.run_indices[j]) {
                std::cmp::Ordering::Equal => return true,
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
            }
        }
        false
    }
}

/// Descending confidence, then matched-token count as the tiebreak.
pub(crate) fn sort_candidates(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then(b.matched_token_count.cmp(&a.matched_token_count))
    });
}

/// Jaccard similarity over token sets.
pub(crate) fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Token set of a group of runs.
pub(crate) fn group_token_set<'a, I>(runs: I) -> HashSet<&'a str>
where
    I: IntoIterator<Item = &'a TextRun>,
{
    runs.into_iter()
        .flat_map(|r| r.tokens.iter().map(String::as_str))
        .collect()
}

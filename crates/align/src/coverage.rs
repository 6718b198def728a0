use crate::sentence::SentenceRef;
use layout::TextRun;

/// Tracks which sentence-token positions accepted runs have explained.
///
/// The covered set only grows: admitting runs in reading order can never
/// reduce cumulative coverage, which the selector's acceptance rules rely
/// on.
#[derive(Debug, Clone)]
pub struct CoverageState {
    covered: Vec<bool>,
    covered_count: usize,
}

impl CoverageState {
    pub fn new(sentence_len: usize) -> Self {
        Self {
            covered: vec![false; sentence_len],
            covered_count: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.covered.len()
    }

    pub fn covered_count(&self) -> usize {
        self.covered_count
    }

    /// Fraction of sentence tokens currently explained.
    pub fn fraction(&self) -> f32 {
        if self.covered.is_empty() {
            0.0
        } else {
            self.covered_count as f32 / self.covered.len() as f32
        }
    }

    /// Coverage the given positions would add, without admitting them.
    pub fn gain_of(&self, positions: &[usize]) -> f32 {
        if self.covered.is_empty() {
            return 0.0;
        }
        let fresh = positions
            .iter()
            .filter(|&&p| p < self.covered.len() && !self.covered[p])
            .count();
        fresh as f32 / self.covered.len() as f32
    }

    /// Mark positions covered; returns the realized gain.
    pub fn admit(&mut self, positions: &[usize]) -> f32 {
        let before = self.covered_count;
        for &p in positions {
            if p < self.covered.len() && !self.covered[p] {
                self.covered[p] = true;
                self.covered_count += 1;
            }
        }
        if self.covered.is_empty() {
            0.0
        } else {
            (self.covered_count - before) as f32 / self.covered.len() as f32
        }
    }
}

/// Sentence-token positions a run explains: position `i` is matched when the
/// run's token set contains the sentence's `i`-th token.
pub fn matched_positions(run: &TextRun, sentence: &SentenceRef) -> Vec<usize> {
    let run_set: std::collections::HashSet<&str> =
        run.tokens.iter().map(String::as_str).collect();
    sentence
        .tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| run_set.contains(t.as_str()))
        .map(|(i, _)| i)
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::LayoutError;
use crate::run::TextRun;

/// In-memory view of one page's runs, ordered by `stable_index`.
///
/// The index is read-only once built. Geometric queries (line grouping,
/// reading order) are computed on demand from the stored boxes; document
/// order is the storage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunIndex {
    page_number: u32,
    runs: Vec<TextRun>,
}

impl RunIndex {
    /// Build an index from extractor output. Runs are sorted by
    /// `stable_index`; duplicates and cross-page runs are rejected.
    pub fn new(page_number: u32, mut runs: Vec<TextRun>) -> Result<Self, LayoutError> {
        for run in &runs {
            if run.page_number != page_number {
                return Err(LayoutError::PageMismatch {
                    index_page: page_number,
                    run_page: run.page_number,
                });
            }
        }
        runs.sort_by_key(|r| r.stable_index);
        for pair in runs.windows(2) {
            if pair[0].stable_index == pair[1].stable_index {
                return Err(LayoutError::DuplicateStableIndex {
                    stable_index: pair[0].stable_index,
                });
            }
        }
        Ok(Self { page_number, runs })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// All runs in document order.
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// The run with the given stable index, if present.
    pub fn run_at(&self, stable_index: u32) -> Option<&TextRun> {
        self.position_of(stable_index).map(|pos| &self.runs[pos])
    }

    /// Position of a stable index within document order.
    pub fn position_of(&self, stable_index: u32) -> Option<usize> {
        self.runs
            .binary_search_by_key(&stable_index, |r| r.stable_index)
            .ok()
    }

    /// A document-order window starting at `start` (a position, not a
    /// stable index), clamped to the page end.
    pub fn window(&self, start: usize, len: usize) -> &[TextRun] {
        if start >= self.runs.len() {
            return &[];
        }
        let end = (start + len).min(self.runs.len());
        &self.runs[start..end]
    }

    /// Group runs into visual lines: runs whose vertical centers fall within
    /// `tolerance` of the line's first member share a line. Returned as
    /// positions into [`runs`](Self::runs), lines top-to-bottom, members
    /// left-to-right.
    pub fn lines(&self, tolerance: f32) -> Vec<Vec<usize>> {
        let mut by_y: Vec<usize> = (0..self.runs.len()).collect();
        by_y.sort_by(|&a, &b| {
            self.runs[a]
                .bbox
                .center_y()
                .total_cmp(&self.runs[b].bbox.center_y())
        });

        let mut lines: Vec<Vec<usize>> = Vec::new();
        let mut anchor_y = f32::NEG_INFINITY;
        for pos in by_y {
            let cy = self.runs[pos].bbox.center_y();
            match lines.last_mut() {
                Some(line) if (cy - anchor_y).abs() <= tolerance => line.push(pos),
                _ => {
                    lines.push(vec![pos]);
                    anchor_y = cy;
                }
            }
        }
        for line in &mut lines {
            line.sort_by(|&a, &b| self.runs[a].bbox.x.total_cmp(&self.runs[b].bbox.x));
        }
        lines
    }

    /// Positions in reading order: top-to-bottom by line, left-to-right
    /// within a line.
    pub fn reading_order(&self, tolerance: f32) -> Vec<usize> {
        self.lines(tolerance).into_iter().flatten().collect()
    }

    /// A sub-index restricted to the given stable indices, preserving
    /// document order. Unknown indices are ignored; the backend's
    /// candidate-run hints are advisory, not authoritative.
    pub fn narrowed(&self, stable_indices: &[u32]) -> RunIndex {
        let wanted: std::collections::HashSet<u32> = stable_indices.iter().copied().collect();
        let runs = self
            .runs
            .iter()
            .filter(|r| wanted.contains(&r.stable_index))
            .cloned()
            .collect();
        Self {
            page_number: self.page_number,
            runs,
        }
    }

    /// Union of all run boxes, `None` for an empty page.
    pub fn page_extent(&self) -> Option<BoundingBox> {
        let mut iter = self.runs.iter();
        let first = iter.next()?.bbox;
        Some(iter.fold(first, |acc, r| acc.union(&r.bbox)))
    }
}

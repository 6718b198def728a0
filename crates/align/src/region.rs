//! Merging selected runs into highlight regions.
//!
//! Accepted runs arrive as individual boxes; the rendering surface wants a
//! handful of coherent rectangles. Runs are sorted into line order and
//! accumulated while they stay on the same visual line (vertical overlap)
//! and close enough horizontally. Merging is per sentence; regions of
//! different sentences never combine, whatever their geometry.

use layout::{BoundingBox, RunIndex};
use serde::{Deserialize, Serialize};

use crate::config::AlignConfig;
use crate::selector::SelectedRun;

/// Confidence band of a region, derived from the originating candidate's
/// confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn for_confidence(confidence: f32, cfg: &AlignConfig) -> Self {
        if confidence >= cfg.tier_high {
            ConfidenceTier::High
        } else if confidence >= cfg.tier_medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    /// Default paint style for the tier.
    pub fn style_hint(&self) -> StyleHint {
        match self {
            ConfidenceTier::High => StyleHint::Solid,
            ConfidenceTier::Medium => StyleHint::Tint,
            ConfidenceTier::Low => StyleHint::Outline,
        }
    }
}

/// How the rendering surface should paint a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleHint {
    Solid,
    Tint,
    Outline,
}

/// One merged highlightable area, the engine's final output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightRegion {
    pub sentence_id: String,
    pub bbox: BoundingBox,
    pub source_run_indices: Vec<u32>,
    pub confidence: f32,
    pub tier: ConfidenceTier,
    pub style_hint: StyleHint,
}

/// Merge one sentence's selected runs into regions.
pub fn merge(
    sentence_id: &str,
    selected: &[SelectedRun],
    index: &RunIndex,
    cfg: &AlignConfig,
) -> Vec<HighlightRegion> {
    let fragments: Vec<Fragment> = selected
        .iter()
        .filter_map(|s| {
            index.run_at(s.stable_index).map(|run| Fragment {
                bbox: run.bbox,
                confidence: s.confidence,
                sources: vec![s.stable_index],
            })
        })
        .collect();

    coalesce(fragments, cfg)
        .into_iter()
        .map(|f| {
            let tier = ConfidenceTier::for_confidence(f.confidence, cfg);
            HighlightRegion {
                sentence_id: sentence_id.to_string(),
                bbox: f.bbox,
                source_run_indices: f.sources,
                confidence: f.confidence,
                tier,
                style_hint: tier.style_hint(),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct Fragment {
    bbox: BoundingBox,
    confidence: f32,
    sources: Vec<u32>,
}

/// Sort fragments into (line, x) order, then accumulate while the next
/// fragment stays vertically aligned with the growing region and within the
/// horizontal gap budget. Already-coalesced output passes through unchanged.
fn coalesce(mut fragments: Vec<Fragment>, cfg: &AlignConfig) -> Vec<Fragment> {
    if fragments.is_empty() {
        return fragments;
    }

    // Line assignment mirrors RunIndex::lines but over arbitrary boxes.
    fragments.sort_by(|a, b| a.bbox.center_y().total_cmp(&b.bbox.center_y()));
    let mut line_of: Vec<usize> = Vec::with_capacity(fragments.len());
    let mut line = 0usize;
    let mut anchor_y = fragments[0].bbox.center_y();
    for f in &fragments {
        let cy = f.bbox.center_y();
        if (cy - anchor_y).abs() > cfg.line_tolerance {
            line += 1;
            anchor_y = cy;
        }
        line_of.push(line);
    }
    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by(|&a, &b| {
        line_of[a]
            .cmp(&line_of[b])
            .then(fragments[a].bbox.x.total_cmp(&fragments[b].bbox.x))
    });

    let mut merged: Vec<Fragment> = Vec::new();
    for idx in order {
        let fragment = &fragments[idx];
        let extend = merged.last().is_some_and(|region| {
            region.bbox.vertical_overlap_ratio(&fragment.bbox) >= cfg.merge_min_vertical_overlap
                && region.bbox.horizontal_gap(&fragment.bbox) <= cfg.merge_max_horizontal_gap
        });
        match merged.last_mut() {
            Some(region) if extend => {
                region.bbox = region.bbox.union(&fragment.bbox);
                region.confidence = region.confidence.max(fragment.confidence);
                region.sources.extend_from_slice(&fragment.sources);
            }
            _ => merged.push(fragment.clone()),
        }
    }

    for region in &mut merged {
        region.sources.sort_unstable();
        region.sources.dedup();
    }
    merged
}

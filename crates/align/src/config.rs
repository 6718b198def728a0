//! Tunables for the strategy chain, candidate selector, and region merger.
//!
//! Every threshold the engine consults lives here with a serde default, so a
//! partial YAML override adjusts one knob without restating the rest. The
//! defaults are the authoritative set; earlier ad-hoc highlighter variants
//! disagreed on several of these constants, and the resolution is to make
//! them configuration rather than pick a variant.

use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// Configuration for per-sentence alignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlignConfig {
    /// A candidate at or above this confidence stops the strategy chain.
    #[serde(default = "default_early_exit_confidence")]
    pub early_exit_confidence: f32,

    /// Vertical-center tolerance for grouping runs into visual lines.
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f32,

    /// Floor below which the exact strategy does not emit its non-exact
    /// best-window fallback.
    #[serde(default = "default_exact_partial_floor")]
    pub exact_partial_floor: f32,

    /// Jaccard acceptance threshold for the line-scoped fuzzy strategy.
    #[serde(default = "default_fuzzy_accept")]
    pub fuzzy_accept: f32,
    /// Confidence scale applied to fuzzy similarities.
    #[serde(default = "default_fuzzy_scale")]
    pub fuzzy_scale: f32,

    /// Fixed window sizes (in runs) for the sliding-window strategy.
    #[serde(default = "default_window_sizes")]
    pub window_sizes: Vec<usize>,
    /// Jaccard acceptance threshold for sliding windows.
    #[serde(default = "default_window_accept")]
    pub window_accept: f32,
    /// Confidence scale applied to sliding-window similarities.
    #[serde(default = "default_window_scale")]
    pub window_scale: f32,

    /// Minimum fraction of a run's tokens that must be keywords for the run
    /// to join the keyword clustering pool.
    #[serde(default = "default_keyword_density_min")]
    pub keyword_density_min: f32,
    /// Maximum center distance between a run and a cluster centroid.
    #[serde(default = "default_keyword_cluster_distance")]
    pub keyword_cluster_distance: f32,
    /// Cluster-to-sentence similarity acceptance threshold.
    #[serde(default = "default_keyword_accept")]
    pub keyword_accept: f32,
    /// Confidence scale applied to keyword cluster similarities.
    #[serde(default = "default_keyword_scale")]
    pub keyword_scale: f32,

    /// Minimum fraction of the sentence an order-preserving subsequence
    /// must cover.
    #[serde(default = "default_subsequence_min_fraction")]
    pub subsequence_min_fraction: f32,
    /// Subsequence similarity acceptance threshold.
    #[serde(default = "default_subsequence_accept")]
    pub subsequence_accept: f32,
    /// Confidence scale applied to subsequence similarities.
    #[serde(default = "default_subsequence_scale")]
    pub subsequence_scale: f32,

    /// Minimum fraction of a run's tokens present in the sentence for the
    /// individual-word fallback to consider the run.
    #[serde(default = "default_fallback_run_overlap")]
    pub fallback_run_overlap: f32,
    /// Maximum horizontal gap for spatial adjacency in the fallback.
    #[serde(default = "default_fallback_max_gap")]
    pub fallback_max_gap: f32,
    /// Vertical-center tolerance for same-line adjacency in the fallback.
    #[serde(default = "default_fallback_line_tolerance")]
    pub fallback_line_tolerance: f32,
    /// Group similarity acceptance threshold for the fallback.
    #[serde(default = "default_fallback_accept")]
    pub fallback_accept: f32,
    /// Confidence scale applied to fallback similarities.
    #[serde(default = "default_fallback_scale")]
    pub fallback_scale: f32,

    /// Maximum center distance when growing a word-order chain.
    #[serde(default = "default_chain_reach")]
    pub chain_reach: f32,
    /// Coverage at which a word-order chain earns its completeness bonus.
    #[serde(default = "default_chain_completeness_coverage")]
    pub chain_completeness_coverage: f32,

    /// Candidate confidence treated as trustworthy during selection.
    #[serde(default = "default_selector_min_confidence")]
    pub selector_min_confidence: f32,
    /// Coverage considered good enough to tighten acceptance.
    #[serde(default = "default_coverage_good")]
    pub coverage_good: f32,
    /// Coverage considered excellent; enables early stop.
    #[serde(default = "default_coverage_excellent")]
    pub coverage_excellent: f32,
    /// Runs contributing less new coverage than this are always skipped.
    #[serde(default = "default_min_new_coverage")]
    pub min_new_coverage: f32,
    /// New coverage that justifies accepting a run on its own.
    #[serde(default = "default_solo_new_coverage")]
    pub solo_new_coverage: f32,
    /// Minimum accepted runs before coverage-based early stop.
    #[serde(default = "default_early_stop_min_runs")]
    pub early_stop_min_runs: usize,

    /// Minimum vertical-overlap ratio for two boxes to merge into one
    /// region.
    #[serde(default = "default_merge_min_vertical_overlap")]
    pub merge_min_vertical_overlap: f32,
    /// Maximum horizontal gap (units) bridged inside one region.
    #[serde(default = "default_merge_max_horizontal_gap")]
    pub merge_max_horizontal_gap: f32,

    /// Confidence at or above which a region is tiered high.
    #[serde(default = "default_tier_high")]
    pub tier_high: f32,
    /// Confidence at or above which a region is tiered medium.
    #[serde(default = "default_tier_medium")]
    pub tier_medium: f32,

    /// Per-strategy cap on emitted candidates, keeping selection bounded.
    #[serde(default = "default_max_candidates_per_strategy")]
    pub max_candidates_per_strategy: usize,
}

impl AlignConfig {
    /// Validate threshold ranges and orderings.
    pub fn validate(&self) -> Result<(), AlignError> {
        fn unit(name: &str, v: f32) -> Result<(), AlignError> {
            if !(0.0..=1.0).contains(&v) {
                return Err(AlignError::InvalidConfig(format!(
                    "{name} must lie in [0.0, 1.0], got {v}"
                )));
            }
            Ok(())
        }

        unit("early_exit_confidence", self.early_exit_confidence)?;
        unit("exact_partial_floor", self.exact_partial_floor)?;
        unit("fuzzy_accept", self.fuzzy_accept)?;
        unit("fuzzy_scale", self.fuzzy_scale)?;
        unit("window_accept", self.window_accept)?;
        unit("window_scale", self.window_scale)?;
        unit("keyword_density_min", self.keyword_density_min)?;
        unit("keyword_accept", self.keyword_accept)?;
        unit("keyword_scale", self.keyword_scale)?;
        unit("subsequence_min_fraction", self.subsequence_min_fraction)?;
        unit("subsequence_accept", self.subsequence_accept)?;
        unit("subsequence_scale", self.subsequence_scale)?;
        unit("fallback_run_overlap", self.fallback_run_overlap)?;
        unit("fallback_accept", self.fallback_accept)?;
        unit("fallback_scale", self.fallback_scale)?;
        unit("chain_completeness_coverage", self.chain_completeness_coverage)?;
        unit("selector_min_confidence", self.selector_min_confidence)?;
        unit("coverage_good", self.coverage_good)?;
        unit("coverage_excellent", self.coverage_excellent)?;
        unit("min_new_coverage", self.min_new_coverage)?;
        unit("solo_new_coverage", self.solo_new_coverage)?;
        unit("merge_min_vertical_overlap", self.merge_min_vertical_overlap)?;
        unit("tier_high", self.tier_high)?;
        unit("tier_medium", self.tier_medium)?;

        if self.window_sizes.is_empty() || self.window_sizes.contains(&0) {
            return Err(AlignError::InvalidConfig(
                "window_sizes must be non-empty and non-zero".into(),
            ));
        }
        if self.coverage_excellent < self.coverage_good {
            return Err(AlignError::InvalidConfig(
                "coverage_excellent must be >= coverage_good".into(),
            ));
        }
        if self.tier_high < self.tier_medium {
            return Err(AlignError::InvalidConfig(
                "tier_high must be >= tier_medium".into(),
            ));
        }
        if self.line_tolerance < 0.0
            || self.keyword_cluster_distance < 0.0
            || self.fallback_max_gap < 0.0
            || self.fallback_line_tolerance < 0.0
            || self.chain_reach < 0.0
            || self.merge_max_horizontal_gap < 0.0
        {
            return Err(AlignError::InvalidConfig(
                "distances and tolerances must be non-negative".into(),
            ));
        }
        if self.early_stop_min_runs == 0 || self.max_candidates_per_strategy == 0 {
            return Err(AlignError::InvalidConfig(
                "run and candidate counts must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            early_exit_confidence: default_early_exit_confidence(),
            line_tolerance: default_line_tolerance(),
            exact_partial_floor: default_exact_partial_floor(),
            fuzzy_accept: default_fuzzy_accept(),
            fuzzy_scale: default_fuzzy_scale(),
            window_sizes: default_window_sizes(),
            window_accept: default_window_accept(),
            window_scale: default_window_scale(),
            keyword_density_min: default_keyword_density_min(),
            keyword_cluster_distance: default_keyword_cluster_distance(),
            keyword_accept: default_keyword_accept(),
            keyword_scale: default_keyword_scale(),
            subsequence_min_fraction: default_subsequence_min_fraction(),
            subsequence_accept: default_subsequence_accept(),
            subsequence_scale: default_subsequence_scale(),
            fallback_run_overlap: default_fallback_run_overlap(),
            fallback_max_gap: default_fallback_max_gap(),
            fallback_line_tolerance: default_fallback_line_tolerance(),
            fallback_accept: default_fallback_accept(),
            fallback_scale: default_fallback_scale(),
            chain_reach: default_chain_reach(),
            chain_completeness_coverage: default_chain_completeness_coverage(),
            selector_min_confidence: default_selector_min_confidence(),
            coverage_good: default_coverage_good(),
            coverage_excellent: default_coverage_excellent(),
            min_new_coverage: default_min_new_coverage(),
            solo_new_coverage: default_solo_new_coverage(),
            early_stop_min_runs: default_early_stop_min_runs(),
            merge_min_vertical_overlap: default_merge_min_vertical_overlap(),
            merge_max_horizontal_gap: default_merge_max_horizontal_gap(),
            tier_high: default_tier_high(),
            tier_medium: default_tier_medium(),
            max_candidates_per_strategy: default_max_candidates_per_strategy(),
        }
    }
}

fn default_early_exit_confidence() -> f32 {
    0.8
}
fn default_line_tolerance() -> f32 {
    5.0
}
fn default_exact_partial_floor() -> f32 {
    0.5
}
fn default_fuzzy_accept() -> f32 {
    0.6
}
fn default_fuzzy_scale() -> f32 {
    0.95
}
fn default_window_sizes() -> Vec<usize> {
    vec![5, 7, 10, 15]
}
fn default_window_accept() -> f32 {
    0.5
}
fn default_window_scale() -> f32 {
    0.9
}
fn default_keyword_density_min() -> f32 {
    0.3
}
fn default_keyword_cluster_distance() -> f32 {
    100.0
}
fn default_keyword_accept() -> f32 {
    0.4
}
fn default_keyword_scale() -> f32 {
    0.85
}
fn default_subsequence_min_fraction() -> f32 {
    0.3
}
fn default_subsequence_accept() -> f32 {
    0.3
}
fn default_subsequence_scale() -> f32 {
    0.8
}
fn default_fallback_run_overlap() -> f32 {
    0.2
}
fn default_fallback_max_gap() -> f32 {
    50.0
}
fn default_fallback_line_tolerance() -> f32 {
    10.0
}
fn default_fallback_accept() -> f32 {
    0.3
}
fn default_fallback_scale() -> f32 {
    0.7
}
fn default_chain_reach() -> f32 {
    120.0
}
fn default_chain_completeness_coverage() -> f32 {
    0.7
}
fn default_selector_min_confidence() -> f32 {
    0.6
}
fn default_coverage_good() -> f32 {
    0.6
}
fn default_coverage_excellent() -> f32 {
    0.8
}
fn default_min_new_coverage() -> f32 {
    0.05
}
fn default_solo_new_coverage() -> f32 {
    0.15
}
fn default_early_stop_min_runs() -> usize {
    3
}
fn default_merge_min_vertical_overlap() -> f32 {
    0.45
}
fn default_merge_max_horizontal_gap() -> f32 {
    24.0
}
fn default_tier_high() -> f32 {
    0.7
}
fn default_tier_medium() -> f32 {
    0.4
}
fn default_max_candidates_per_strategy() -> usize {
    4
}

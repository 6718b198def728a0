//! Provenance-to-layout alignment engine.
//!
//! A question-answering backend asserts that certain sentences support an
//! answer; a page renderer fragments the document into positioned text runs
//! that respect neither word nor sentence boundaries. This crate computes
//! which runs, merged into screen-space regions, should be highlighted for
//! each sentence — tolerating OCR artifacts, line wraps, and font-driven
//! fragment splits through a ladder of matching strategies with calibrated
//! confidence.
//!
//! The stage crates do the work: `normalize` reduces text to comparable
//! tokens, `layout` holds the per-page run index, and `align` runs the
//! strategy chain, candidate selection, and region merging. This umbrella
//! adds the orchestrator ([`HighlightEngine`]), the alignment cache, YAML
//! configuration, and the collaborator traits a host implements
//! ([`SentenceMapper`], [`RenderSurface`]).
//!
//! ```no_run
//! use std::sync::Arc;
//! use provalign::{
//!     EngineConfig, HighlightEngine, HighlightRegion, RenderSurface, SentenceRequest,
//! };
//!
//! struct Console;
//! impl RenderSurface for Console {
//!     fn paint(&self, regions: &[HighlightRegion]) {
//!         for r in regions {
//!             println!("{}: {:?}", r.sentence_id, r.bbox);
//!         }
//!     }
//!     fn clear(&self) {}
//! }
//!
//! # async fn demo(index: provalign::RunIndex) -> Result<(), provalign::EngineError> {
//! let engine = HighlightEngine::new(EngineConfig::default(), Arc::new(Console))?;
//! let requests = [SentenceRequest::with_text(
//!     "s1",
//!     "The tenant must vacate within 30 days.",
//! )];
//! engine.request_highlight("doc-1", &requests, 1, &index).await;
//! # Ok(())
//! # }
//! ```

mod cache;
mod config;
mod engine;

pub use align::{
    align_sentence, align_sentence_with, matched_positions, merge, select, word_order_chain,
    AlignConfig, AlignError, ConfidenceTier, CoverageState, HighlightRegion, MatchCandidate,
    SelectedRun, SentenceAlignment, SentenceRef, StrategyChain, StrategyKind, StyleHint,
};
pub use layout::{BoundingBox, LayoutError, RunIndex, TextRun};
pub use normalize::{keywords, normalize, NormalizeConfig, NormalizeError};

pub use crate::cache::{AlignmentCache, CacheKey};
pub use crate::config::{ConfigError, EngineConfig, OrchestratorConfig};
pub use crate::engine::{
    ClearReason, EngineState, HighlightEngine, MappingError, RenderSurface, ResolutionOutcome,
    SentenceMapper, SentenceMapping, SentenceRequest,
};

use std::sync::{Arc, OnceLock, RwLock};
use std::time::Duration;

use thiserror::Error;

/// Errors that can escape engine construction or configuration loading.
/// Resolution-time failures never surface here; they become
/// [`ResolutionOutcome`] variants.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Outcome class of one resolution, for metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    Resolved,
    Cleared,
    Superseded,
    Failed,
}

/// Metrics observer for the engine's diagnostic channel.
pub trait EngineMetrics: Send + Sync {
    fn record_resolution(&self, latency: Duration, kind: ResolutionKind);
    fn record_cache_probe(&self, hit: bool);
}

/// Install or clear the global engine metrics recorder.
pub fn set_engine_metrics(recorder: Option<Arc<dyn EngineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().unwrap_or_else(|e| e.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn EngineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn EngineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn EngineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

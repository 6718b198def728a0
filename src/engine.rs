//! The orchestrator: one call from sentence references to painted regions.
//!
//! `HighlightEngine` wires the normalizer, strategy chain, selector, and
//! merger behind a single asynchronous entry point, with a debounce delay,
//! a liveness token for last-triggered-wins ordering, and the alignment
//! cache. The mapping fetch is the only suspension point on external I/O;
//! everything after it re-checks liveness before touching the surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use align::{align_sentence_with, AlignError, HighlightRegion, SentenceRef, StrategyChain};
use layout::RunIndex;

use crate::cache::{AlignmentCache, CacheKey};
use crate::config::EngineConfig;
use crate::{metrics_recorder, ResolutionKind};

/// One sentence to locate. `text` may be omitted when a mapping service
/// supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRequest {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl SentenceRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
        }
    }

    pub fn with_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
        }
    }
}

/// Backend-assisted hint for one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceMapping {
    pub sentence_id: String,
    pub found: bool,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub sentence_text: Option<String>,
    /// Stable indices the backend believes display the sentence; narrows
    /// the search space when present.
    #[serde(default)]
    pub candidate_runs: Option<Vec<u32>>,
}

/// Failure reported by a sentence mapping service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("sentence mapping fetch failed: {0}")]
pub struct MappingError(pub String);

/// External sentence mapping service. Absence degrades to full-page search.
#[async_trait]
pub trait SentenceMapper: Send + Sync {
    async fn map_sentences(
        &self,
        document_id: &str,
        sentence_ids: &[String],
    ) -> Result<Vec<SentenceMapping>, MappingError>;
}

/// External rendering surface: paints region lists and clears them.
pub trait RenderSurface: Send + Sync {
    fn paint(&self, regions: &[HighlightRegion]);
    fn clear(&self);
}

/// Why a resolution ended with an empty region set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearReason {
    /// The request named no sentences.
    EmptySelection,
    /// No runs for the requested page, or every sentence maps elsewhere.
    MissingPageData,
    /// Strategies exhausted without a candidate for any sentence.
    NoMatch,
}

/// Terminal result of one `request_highlight` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Resolved { regions: Vec<HighlightRegion> },
    Cleared { reason: ClearReason },
    /// A newer trigger superseded this resolution; nothing was painted.
    Superseded,
    Failed { error: String },
}

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Resolving,
    Resolved,
    Cleared,
    Failed,
}

/// The alignment engine's orchestrator.
///
/// One instance serves one document view. Only the latest triggered
/// resolution may touch the surface: each call takes a fresh generation
/// number, and any await is followed by a staleness check that turns the
/// call into a no-op [`ResolutionOutcome::Superseded`] once a newer trigger
/// exists.
pub struct HighlightEngine {
    config: EngineConfig,
    chain: StrategyChain,
    mapper: Option<Arc<dyn SentenceMapper>>,
    surface: Arc<dyn RenderSurface>,
    generation: AtomicU64,
    state: Mutex<EngineState>,
    cache: Mutex<AlignmentCache>,
    current_document: Mutex<Option<String>>,
}

impl HighlightEngine {
    pub fn new(
        config: EngineConfig,
        surface: Arc<dyn RenderSurface>,
    ) -> Result<Self, crate::EngineError> {
        config.validate()?;
        let cache = AlignmentCache::new(config.orchestrator.cache_capacity);
        Ok(Self {
            config,
            chain: StrategyChain::standard(),
            mapper: None,
            surface,
            generation: AtomicU64::new(0),
            state: Mutex::new(EngineState::Idle),
            cache: Mutex::new(cache),
            current_document: Mutex::new(None),
        })
    }

    /// Attach a sentence mapping service.
    pub fn with_mapper(mut self, mapper: Arc<dyn SentenceMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Last lifecycle state. A new trigger moves it back through
    /// `Resolving`.
    pub fn state(&self) -> EngineState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Resolve highlight regions for the given sentences on the current
    /// page and hand them to the rendering surface.
    ///
    /// Never returns an error to the host: failures surface as
    /// [`ResolutionOutcome::Failed`] and diagnostics go through `tracing`
    /// and the metrics observer.
    pub async fn request_highlight(
        &self,
        document_id: &str,
        requests: &[SentenceRequest],
        page_number: u32,
        index: &RunIndex,
    ) -> ResolutionOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();
        self.set_state(EngineState::Resolving);

        // Document switch invalidates the cache wholesale.
        {
            let mut current = self
                .current_document
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if current.as_deref() != Some(document_id) {
                if current.is_some() {
                    self.cache
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .clear();
                }
                *current = Some(document_id.to_string());
            }
        }

        let debounce = self.config.orchestrator.debounce_ms;
        if debounce > 0 {
            tokio::time::sleep(Duration::from_millis(debounce)).await;
        }
        if self.is_stale(generation) {
            return self.superseded(started);
        }

        if requests.is_empty() {
            return self.cleared(ClearReason::EmptySelection, started);
        }
        if index.is_empty() || index.page_number() != page_number {
            debug!(page_number, "no runs for requested page");
            return self.cleared(ClearReason::MissingPageData, started);
        }

        let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();
        let key = CacheKey::new(
            document_id,
            &ids,
            page_number,
            self.config.orchestrator.scale_key,
        );
        let cached = {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            let hit = cache.get(&key).cloned();
            if let Some(metrics) = metrics_recorder() {
                metrics.record_cache_probe(hit.is_some());
            }
            hit
        };
        if let Some(regions) = cached {
            return self.resolved(regions, started);
        }

        // The only await on external I/O. Everything below re-checks
        // liveness before touching the surface.
        let mappings = match &self.mapper {
            Some(mapper) => match mapper.map_sentences(document_id, &ids).await {
                Ok(mappings) => mappings
                    .into_iter()
                    .map(|m| (m.sentence_id.clone(), m))
                    .collect::<HashMap<_, _>>(),
                Err(err) => {
                    warn!(%err, "sentence mapping fetch failed");
                    if self.is_stale(generation) {
                        return self.superseded(started);
                    }
                    self.surface.clear();
                    self.set_state(EngineState::Failed);
                    self.record(ResolutionKind::Failed, started);
                    return ResolutionOutcome::Failed {
                        error: err.to_string(),
                    };
                }
            },
            None => HashMap::new(),
        };
        if self.is_stale(generation) {
            return self.superseded(started);
        }

        let (regions, skipped_elsewhere) =
            self.align_all(requests, &mappings, page_number, index);
        if self.is_stale(generation) {
            return self.superseded(started);
        }

        if regions.is_empty() {
            let reason = if skipped_elsewhere == requests.len() {
                ClearReason::MissingPageData
            } else {
                ClearReason::NoMatch
            };
            return self.cleared(reason, started);
        }

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .put(key, regions.clone());
        self.resolved(regions, started)
    }

    /// Remove all highlights and invalidate any in-flight resolution.
    pub fn clear_highlights(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.surface.clear();
        self.set_state(EngineState::Cleared);
    }

    /// Drop cached resolutions for one document, e.g. when its provenance
    /// changes server-side.
    pub fn invalidate_document(&self, document_id: &str) {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .invalidate_document(document_id);
    }

    /// Align every request; returns the merged regions and how many
    /// sentences were skipped because the mapping places them off-page.
    fn align_all(
        &self,
        requests: &[SentenceRequest],
        mappings: &HashMap<String, SentenceMapping>,
        page_number: u32,
        index: &RunIndex,
    ) -> (Vec<HighlightRegion>, usize) {
        let mut regions = Vec::new();
        let mut skipped_elsewhere = 0usize;

        for request in requests {
            let mapping = mappings.get(&request.id);

            if let Some(m) = mapping {
                if !m.found {
                    debug!(sentence_id = %request.id, "mapping reports sentence not found");
                    skipped_elsewhere += 1;
                    continue;
                }
                if m.page_number.is_some_and(|p| p != page_number) {
                    debug!(
                        sentence_id = %request.id,
                        mapped_page = m.page_number,
                        page_number,
                        "sentence maps to another page"
                    );
                    skipped_elsewhere += 1;
                    continue;
                }
            }

            let text = request
                .text
                .as_deref()
                .or_else(|| mapping.and_then(|m| m.sentence_text.as_deref()));
            let Some(text) = text else {
                warn!(sentence_id = %request.id, "no sentence text from request or mapping");
                continue;
            };

            let sentence = match SentenceRef::new(&request.id, text, &self.config.normalize) {
                Ok(sentence) => sentence,
                Err(err) => {
                    debug!(sentence_id = %request.id, %err, "sentence rejected");
                    continue;
                }
            };

            // Candidate-run hints narrow the search; an empty narrowing
            // falls back to the full page.
            let narrowed = mapping
                .and_then(|m| m.candidate_runs.as_deref())
                .map(|hint| index.narrowed(hint))
                .filter(|n| !n.is_empty());
            let search_index = narrowed.as_ref().unwrap_or(index);

            match align_sentence_with(&self.chain, &sentence, search_index, &self.config.align) {
                Ok(alignment) => {
                    debug!(
                        sentence_id = %request.id,
                        strategy = alignment.strategy.as_str(),
                        confidence = alignment.confidence,
                        regions = alignment.regions.len(),
                        "sentence aligned"
                    );
                    regions.extend(alignment.regions);
                }
                Err(AlignError::NoMatch { .. }) => {
                    debug!(sentence_id = %request.id, "no strategy matched");
                }
                Err(err) => {
                    debug!(sentence_id = %request.id, %err, "alignment error");
                }
            }
        }

        (regions, skipped_elsewhere)
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    fn set_state(&self, state: EngineState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    fn record(&self, kind: ResolutionKind, started: Instant) {
        if let Some(metrics) = metrics_recorder() {
            metrics.record_resolution(started.elapsed(), kind);
        }
    }

    fn superseded(&self, started: Instant) -> ResolutionOutcome {
        // A newer trigger owns the surface and the state; this resolution
        // vanishes without side effects.
        self.record(ResolutionKind::Superseded, started);
        ResolutionOutcome::Superseded
    }

    fn cleared(&self, reason: ClearReason, started: Instant) -> ResolutionOutcome {
        self.surface.clear();
        self.set_state(EngineState::Cleared);
        self.record(ResolutionKind::Cleared, started);
        ResolutionOutcome::Cleared { reason }
    }

    fn resolved(&self, regions: Vec<HighlightRegion>, started: Instant) -> ResolutionOutcome {
        // Clear-before-new: stale paint from the previous resolution comes
        // off before the new regions go on.
        self.surface.clear();
        self.surface.paint(&regions);
        self.set_state(EngineState::Resolved);
        self.record(ResolutionKind::Resolved, started);
        ResolutionOutcome::Resolved { regions }
    }
}

//! Shared collaborators for the integration suites: a surface that records
//! every paint/clear, and a programmable mapping service.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use provalign::{
    BoundingBox, HighlightRegion, MappingError, NormalizeConfig, RenderSurface, RunIndex,
    SentenceMapper, SentenceMapping, TextRun,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Clear,
    Paint(Vec<HighlightRegion>),
}

/// Rendering surface that logs every command it receives, in order.
#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn painted_regions(&self) -> Vec<Vec<HighlightRegion>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Paint(regions) => Some(regions),
                SurfaceEvent::Clear => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn paint(&self, regions: &[HighlightRegion]) {
        self.events
            .lock()
            .unwrap()
            .push(SurfaceEvent::Paint(regions.to_vec()));
    }

    fn clear(&self) {
        self.events.lock().unwrap().push(SurfaceEvent::Clear);
    }
}

/// Mapping service returning a fixed answer, with an optional artificial
/// delay and failure mode, counting its invocations.
pub struct StaticMapper {
    pub mappings: Vec<SentenceMapping>,
    pub delay: Duration,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StaticMapper {
    pub fn with_mappings(mappings: Vec<SentenceMapping>) -> Self {
        Self {
            mappings,
            delay: Duration::ZERO,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            mappings: Vec::new(),
            delay: Duration::ZERO,
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentenceMapper for StaticMapper {
    async fn map_sentences(
        &self,
        _document_id: &str,
        _sentence_ids: &[String],
    ) -> Result<Vec<SentenceMapping>, MappingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(MappingError("backend unavailable".into()));
        }
        Ok(self.mappings.clone())
    }
}

/// A page of runs laid out 4 to a line, 16 units of leading.
pub fn page(page_number: u32, texts: &[&str]) -> RunIndex {
    let ncfg = NormalizeConfig::default();
    let runs = texts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            TextRun::new(
                i as u32,
                page_number,
                *t,
                BoundingBox::new((i % 4) as f32 * 70.0, (i / 4) as f32 * 16.0, 65.0, 12.0),
                &ncfg,
            )
        })
        .collect();
    RunIndex::new(page_number, runs).expect("index builds")
}

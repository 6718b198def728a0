use normalize::{normalize, NormalizeConfig};
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;

/// One positioned text fragment on a page.
///
/// Runs are produced by the external extractor per page render and are
/// immutable afterwards. `stable_index` is the document-order key, unique
/// per page and consistent with the renderer's reading order. `tokens` holds
/// the normalized form of `raw_text`, computed once at construction so the
/// matching layer never re-tokenizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub stable_index: u32,
    pub page_number: u32,
    pub raw_text: String,
    pub tokens: Vec<String>,
    pub bbox: BoundingBox,
}

impl TextRun {
    pub fn new(
        stable_index: u32,
        page_number: u32,
        raw_text: impl Into<String>,
        bbox: BoundingBox,
        cfg: &NormalizeConfig,
    ) -> Self {
        let raw_text = raw_text.into();
        let tokens = normalize(&raw_text, cfg);
        Self {
            stable_index,
            page_number,
            raw_text,
            tokens,
            bbox,
        }
    }

    /// Construct from pre-normalized tokens, for callers that already ran
    /// the normalizer (e.g. deserialized extractor output).
    pub fn from_tokens(
        stable_index: u32,
        page_number: u32,
        raw_text: impl Into<String>,
        tokens: Vec<String>,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            stable_index,
            page_number,
            raw_text: raw_text.into(),
            tokens,
            bbox,
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

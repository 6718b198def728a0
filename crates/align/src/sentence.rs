use normalize::{keywords, normalize, NormalizeConfig};
use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// A unit of provenance to align: backend-asserted supporting text.
///
/// Tokens and keywords are computed once at construction; a reference whose
/// text normalizes to nothing is rejected rather than silently matching
/// everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRef {
    pub id: String,
    pub raw_text: String,
    pub tokens: Vec<String>,
    pub keywords: Vec<String>,
}

impl SentenceRef {
    pub fn new(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        cfg: &NormalizeConfig,
    ) -> Result<Self, AlignError> {
        let id = id.into();
        let raw_text = raw_text.into();
        let tokens = normalize(&raw_text, cfg);
        if tokens.is_empty() {
            return Err(AlignError::EmptySentence { sentence_id: id });
        }
        let keywords = keywords(&raw_text, cfg);
        Ok(Self {
            id,
            raw_text,
            tokens,
            keywords,
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// First normalized token; anchors at the sentence start.
    pub fn first_token(&self) -> &str {
        &self.tokens[0]
    }

    /// Last normalized token; anchors at the sentence end.
    pub fn last_token(&self) -> &str {
        &self.tokens[self.tokens.len() - 1]
    }
}

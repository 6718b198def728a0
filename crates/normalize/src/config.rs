//! Configuration for token normalization.

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

/// Controls how raw text is reduced to comparable tokens.
///
/// `NormalizeConfig` is cheap to clone and serde-friendly so it can be
/// embedded in higher-level engine configuration. Two minimum lengths exist
/// because general token comparison and keyword extraction want different
/// noise floors: a two-character token ("30", "no") still carries signal when
/// comparing whole sentences, but is useless as a standalone keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeConfig {
    /// Minimum token length for general normalization. Tokens shorter than
    /// this are dropped after splitting.
    #[serde(default = "NormalizeConfig::default_min_token_len")]
    pub min_token_len: usize,

    /// Minimum token length for keyword extraction. Applied together with
    /// the stopword filter.
    #[serde(default = "NormalizeConfig::default_keyword_min_len")]
    pub keyword_min_len: usize,
}

impl NormalizeConfig {
    pub(crate) fn default_min_token_len() -> usize {
        2
    }

    pub(crate) fn default_keyword_min_len() -> usize {
        3
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.min_token_len == 0 {
            return Err(NormalizeError::InvalidConfig(
                "min_token_len must be >= 1".into(),
            ));
        }
        if self.keyword_min_len < self.min_token_len {
            return Err(NormalizeError::InvalidConfig(
                "keyword_min_len must be >= min_token_len".into(),
            ));
        }
        Ok(())
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_token_len: Self::default_min_token_len(),
            keyword_min_len: Self::default_keyword_min_len(),
        }
    }
}

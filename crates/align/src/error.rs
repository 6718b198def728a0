use thiserror::Error;

/// Errors produced by the alignment layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// Configuration failed validation.
    #[error("invalid align configuration: {0}")]
    InvalidConfig(String),
    /// A sentence reference normalized to zero tokens.
    #[error("sentence {sentence_id} has no comparable tokens")]
    EmptySentence { sentence_id: String },
    /// Every strategy was exhausted without producing a candidate.
    #[error("no strategy matched sentence {sentence_id}")]
    NoMatch { sentence_id: String },
    /// The run index holds no runs for the requested page.
    #[error("no runs available on page {page_number}")]
    NoRuns { page_number: u32 },
}

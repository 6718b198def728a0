use thiserror::Error;

/// Errors produced by the normalization layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("invalid normalize configuration: {0}")]
    InvalidConfig(String),
}

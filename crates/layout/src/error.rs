use thiserror::Error;

/// Errors produced when building a run index.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("duplicate stable index {stable_index} on page")]
    DuplicateStableIndex { stable_index: u32 },
    #[error("run for page {run_page} added to index for page {index_page}")]
    PageMismatch { index_page: u32, run_page: u32 },
}

//! Matching strategies, ordered from highest to lowest fidelity.
//!
//! Each strategy turns (sentence, run index) into ranked [`MatchCandidate`]s
//! under its own acceptance threshold and confidence scale; the chain runs
//! them by priority and stops early on a confident result. The fidelity
//! ladder exists because renderer fragmentation degrades unpredictably: an
//! exact window match is rare on real pages, so each rung tolerates one more
//! kind of noise than the rung above it.

mod exact;
mod fallback;
mod fuzzy;
mod keyword;
mod subsequence;
mod window;

pub use exact::ExactConsecutive;
pub use fallback::WordFallback;
pub use fuzzy::FuzzyLine;
pub use keyword::KeywordCluster;
pub use subsequence::PartialSubsequence;
pub use window::SlidingWindow;

use layout::RunIndex;

use crate::candidate::{MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::sentence::SentenceRef;

/// One matching algorithm in the chain.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Propose candidates for a sentence against one page's runs. Returned
    /// candidates need not be sorted; the chain sorts globally.
    fn propose(
        &self,
        sentence: &SentenceRef,
        index: &RunIndex,
        cfg: &AlignConfig,
    ) -> Vec<MatchCandidate>;
}

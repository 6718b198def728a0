//! Positioned text runs and the per-page run index.
//!
//! A renderer fragments page text into "runs": positioned fragments that
//! respect neither word nor sentence boundaries. This crate gives the
//! matching layer a stable, queryable view of one page's runs: document
//! order by `stable_index`, visual lines grouped by vertical center, reading
//! order (top-to-bottom by line, left-to-right within a line), and windows
//! over document order.
//!
//! Coordinates are page-space units with the origin at the top-left and `y`
//! growing downward, independent of display zoom.

mod bbox;
mod error;
mod index;
mod run;

pub use crate::bbox::BoundingBox;
pub use crate::error::LayoutError;
pub use crate::index::RunIndex;
pub use crate::run::TextRun;

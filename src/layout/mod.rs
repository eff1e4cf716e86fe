//! Line reconstruction and feature extraction.
//!
//! Words from a page are grouped by their rounded `top` coordinate, joined
//! left to right with a gap-based spacing rule, and summarised into
//! [`Line`](crate::model::Line) records ready for classification.

mod features;
mod reconstruct;

pub use features::FeatureExtractor;
pub use reconstruct::{LineOrder, LineReconstructor, WordGroup, DEFAULT_SPACE_GAP};

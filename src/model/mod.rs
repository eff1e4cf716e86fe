//! Data model types shared by the extraction stages.
//!
//! Words flow in from a word source, lines are reconstructed and labelled,
//! and a [`DocumentResult`] is emitted per document. Each stage owns the
//! records it produces until it hands them to the next.

mod line;
mod outline;
mod word;

pub use line::{ClassifiedLine, FeatureRecord, Line, FEATURE_COLUMNS};
pub use outline::{DocumentResult, HeadingLevel, OutlineEntry, UNTITLED};
pub use word::Word;

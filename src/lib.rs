//! # unoutline
//!
//! Heading outline extraction for PDF documents.
//!
//! This library rebuilds text lines from positioned words, computes
//! typography and geometry features for each line, classifies them with a
//! pre-trained model, and emits the document title plus an H1/H2/H3
//! outline with page numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoutline::{DocumentPipeline, ModelClassifier};
//!
//! fn main() -> unoutline::Result<()> {
//!     let classifier = ModelClassifier::load(
//!         "models/headings_model.json",
//!         "models/label_encoder.json",
//!     )?;
//!     let pipeline = DocumentPipeline::new(classifier);
//!
//!     if let Some(result) = pipeline.process_file("document.pdf")?.into_result() {
//!         println!("{}", unoutline::render::to_json(&result, Default::default())?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line reconstruction**: words grouped by rounded vertical position
//! - **Pluggable stages**: any [`WordSource`] and any [`LineClassifier`]
//! - **Decision forest models**: loaded from JSON artifacts
//! - **Batch processing**: per-file reports, optional Rayon parallelism

pub mod classify;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod outline;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use classify::{ForestModel, LabelEncoder, LineClassifier, ModelClassifier};
pub use error::{Error, Result};
pub use layout::{FeatureExtractor, LineOrder, LineReconstructor};
pub use model::{
    ClassifiedLine, DocumentResult, FeatureRecord, HeadingLevel, Line, OutlineEntry, Word,
    UNTITLED,
};
pub use outline::{select_title, OutlineBuilder, OutlineOrder, TitleSelector};
pub use parser::{MemoryWordSource, PdfWordSource, WordSource};
pub use pipeline::{
    BatchReport, DocumentOutcome, DocumentPipeline, ErrorMode, FileReport, FileStatus,
    PipelineOptions,
};
pub use render::JsonFormat;

use std::path::Path;

/// Reconstruct the lines of a PDF file, with their features.
///
/// No classifier is involved; this is the input the classifier would see.
/// Unreadable pages are skipped, as in [`DocumentPipeline`].
///
/// # Example
///
/// ```no_run
/// use unoutline::extract_lines;
///
/// for line in extract_lines("document.pdf").unwrap() {
///     println!("p{} {:>5.1} {}", line.page, line.font_size, line.text);
/// }
/// ```
pub fn extract_lines<P: AsRef<Path>>(path: P) -> Result<Vec<Line>> {
    extract_lines_with_options(path, PipelineOptions::default())
}

/// Reconstruct the lines of a PDF file using the line order and error mode
/// of `options`.
pub fn extract_lines_with_options<P: AsRef<Path>>(
    path: P,
    options: PipelineOptions,
) -> Result<Vec<Line>> {
    let source = PdfWordSource::open(path)?;
    let reconstructor = LineReconstructor::new().with_order(options.line_order);
    pipeline::reconstruct_lines(&reconstructor, &source, options.error_mode)
}

/// Extract the outline of one PDF file with the given classifier.
///
/// Returns `None` when the document has no text.
///
/// # Example
///
/// ```no_run
/// use unoutline::{extract_outline, ModelClassifier};
///
/// let classifier = ModelClassifier::load("headings_model.json", "label_encoder.json").unwrap();
/// if let Some(result) = extract_outline("document.pdf", &classifier).unwrap() {
///     println!("{}: {} headings", result.title, result.outline.len());
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>, C: LineClassifier>(
    path: P,
    classifier: C,
) -> Result<Option<DocumentResult>> {
    let pipeline = DocumentPipeline::new(classifier);
    Ok(pipeline.process_file(path)?.into_result())
}

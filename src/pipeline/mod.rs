//! Per-document orchestration and the directory batch driver.
//!
//! A [`DocumentPipeline`] owns its classifier and runs every stage for one
//! document at a time: words are pulled page by page from a
//! [`WordSource`], rebuilt into lines, classified in one batch, and reduced
//! to a title and outline.

mod batch;
mod options;

pub use batch::{list_inputs, output_path, BatchReport, FileReport, FileStatus};
pub use options::{ErrorMode, LineOrder, OutlineOrder, PipelineOptions};

use std::path::Path;

use crate::classify::LineClassifier;
use crate::error::{Error, Result};
use crate::layout::LineReconstructor;
use crate::model::{ClassifiedLine, DocumentResult, Line};
use crate::outline::{OutlineBuilder, TitleSelector};
use crate::parser::{PdfWordSource, WordSource};
use crate::render::write_result;

/// Reason reported for documents that produce no lines.
pub const NO_TEXT: &str = "no text found";

/// What processing a single document produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    /// The document yielded lines and an outline result
    Processed(DocumentResult),
    /// The document yielded no lines
    Skipped(String),
}

impl DocumentOutcome {
    /// The result, if the document was processed.
    pub fn into_result(self) -> Option<DocumentResult> {
        match self {
            DocumentOutcome::Processed(result) => Some(result),
            DocumentOutcome::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DocumentOutcome::Skipped(_))
    }
}

/// Runs line reconstruction, classification and outline assembly.
pub struct DocumentPipeline<C: LineClassifier> {
    classifier: C,
    options: PipelineOptions,
    reconstructor: LineReconstructor,
    titles: TitleSelector,
    outline: OutlineBuilder,
}

/// Reconstruct the lines of every page of `source`, pages in ascending order.
///
/// A page whose words cannot be read fails the call in strict mode and is
/// skipped with a warning in lenient mode.
pub fn reconstruct_lines(
    reconstructor: &LineReconstructor,
    source: &dyn WordSource,
    mode: ErrorMode,
) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for page in 1..=source.page_count() {
        let words = match source.page_words(page) {
            Ok(words) => words,
            Err(e) if mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", page, e);
                continue;
            }
            Err(e) => return Err(e),
        };
        lines.extend(reconstructor.reconstruct_page(page, &words));
    }
    Ok(lines)
}

impl<C: LineClassifier> DocumentPipeline<C> {
    /// Create a pipeline with default options.
    pub fn new(classifier: C) -> Self {
        Self::with_options(classifier, PipelineOptions::default())
    }

    /// Create a pipeline with custom options.
    pub fn with_options(classifier: C, options: PipelineOptions) -> Self {
        Self {
            classifier,
            options,
            reconstructor: LineReconstructor::new().with_order(options.line_order),
            titles: TitleSelector::new(),
            outline: OutlineBuilder::new().with_order(options.outline_order),
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Reconstruct the lines of every page, pages in ascending order.
    pub fn extract_lines(&self, source: &dyn WordSource) -> Result<Vec<Line>> {
        reconstruct_lines(&self.reconstructor, source, self.options.error_mode)
    }

    /// Classify all lines in one call, pairing each line with its label.
    pub fn classify_lines(&self, lines: Vec<Line>) -> Result<Vec<ClassifiedLine>> {
        let features = self.reconstructor.features().feature_table(&lines);
        let labels = self.classifier.classify(&features)?;
        if labels.len() != lines.len() {
            return Err(Error::Classify(format!(
                "classifier returned {} labels for {} lines",
                labels.len(),
                lines.len()
            )));
        }

        Ok(lines
            .into_iter()
            .zip(labels)
            .map(|(line, label)| ClassifiedLine::new(line, label))
            .collect())
    }

    /// Select the title and build the outline from classified lines.
    pub fn assemble(&self, classified: &[ClassifiedLine]) -> DocumentResult {
        DocumentResult {
            title: self.titles.select(classified.iter().map(|c| &c.line)),
            outline: self.outline.build(classified),
        }
    }

    /// Process an already-open word source.
    pub fn process_source(&self, source: &dyn WordSource) -> Result<DocumentOutcome> {
        let lines = self.extract_lines(source)?;
        if lines.is_empty() {
            return Ok(DocumentOutcome::Skipped(NO_TEXT.to_string()));
        }

        let line_count = lines.len();
        let classified = self.classify_lines(lines)?;
        let result = self.assemble(&classified);
        log::debug!(
            "{} lines -> {} outline entries, title {:?}",
            line_count,
            result.outline.len(),
            result.title
        );
        Ok(DocumentOutcome::Processed(result))
    }

    /// Process one PDF file.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<DocumentOutcome> {
        let path = path.as_ref();
        let outcome = {
            let source = PdfWordSource::open(path)?;
            self.process_source(&source)?
        };
        if let DocumentOutcome::Skipped(reason) = &outcome {
            log::warn!("{}: {}, skipping", path.display(), reason);
        }
        Ok(outcome)
    }

    /// Process one PDF file and write `<stem>.json` into `output_dir`.
    ///
    /// Skipped documents write nothing. Never returns [`FileStatus::Failed`];
    /// failures come back as errors.
    pub fn process_file_to<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path: P,
        output_dir: Q,
    ) -> Result<FileStatus> {
        let path = path.as_ref();
        match self.process_file(path)? {
            DocumentOutcome::Processed(result) => {
                let output = output_path(path, output_dir.as_ref());
                write_result(&result, &output)?;
                Ok(FileStatus::Processed { output })
            }
            DocumentOutcome::Skipped(reason) => Ok(FileStatus::Skipped { reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureRecord, HeadingLevel, Word};
    use crate::parser::MemoryWordSource;

    /// Returns the given labels in order, ignoring the features.
    struct FixedLabels(Vec<&'static str>);

    impl LineClassifier for FixedLabels {
        fn classify(&self, features: &[FeatureRecord]) -> Result<Vec<String>> {
            Ok(self
                .0
                .iter()
                .take(features.len())
                .map(|s| s.to_string())
                .collect())
        }
    }

    /// Labels lines at 14pt and above as H1.
    struct BySize;

    impl LineClassifier for BySize {
        fn classify(&self, features: &[FeatureRecord]) -> Result<Vec<String>> {
            Ok(features
                .iter()
                .map(|f| if f.font_size >= 14.0 { "H1" } else { "Body" }.to_string())
                .collect())
        }
    }

    /// A source whose second page cannot be read.
    struct BrokenPage;

    impl WordSource for BrokenPage {
        fn page_count(&self) -> u32 {
            2
        }

        fn page_words(&self, page: u32) -> Result<Vec<Word>> {
            match page {
                1 => Ok(vec![Word::new("Intro", 72.0, 100.0, 80.0, "Helvetica", 12.0)]),
                _ => Err(Error::PdfParse("bad content stream".to_string())),
            }
        }
    }

    fn report_source() -> MemoryWordSource {
        MemoryWordSource::new(vec![vec![
            Word::new("Project", 72.0, 160.0, 90.0, "Helvetica-Bold", 24.0),
            Word::new("Report", 166.7, 240.0, 90.0, "Helvetica-Bold", 24.0),
            Word::new("1.", 72.0, 82.0, 140.0, "Helvetica", 14.0),
            Word::new("Overview", 85.9, 150.0, 140.0, "Helvetica", 14.0),
        ]])
    }

    #[test]
    fn test_project_report_scenario() {
        let pipeline = DocumentPipeline::new(FixedLabels(vec!["Title", "H1"]));
        let result = pipeline
            .process_source(&report_source())
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(result.title, "Project Report");
        assert_eq!(result.outline.len(), 1);
        assert_eq!(result.outline[0].level, HeadingLevel::H1);
        assert_eq!(result.outline[0].text, "1. Overview");
        assert_eq!(result.outline[0].page, 1);
    }

    #[test]
    fn test_empty_document_skipped() {
        let pipeline = DocumentPipeline::new(BySize);
        let empty = MemoryWordSource::new(vec![vec![], vec![]]);
        let outcome = pipeline.process_source(&empty).unwrap();
        assert_eq!(outcome, DocumentOutcome::Skipped(NO_TEXT.to_string()));

        // Single-character lines are dropped, so nothing remains.
        let stray = MemoryWordSource::new(vec![vec![Word::new("x", 0.0, 5.0, 10.0, "F", 12.0)]]);
        assert!(pipeline.process_source(&stray).unwrap().is_skipped());
    }

    #[test]
    fn test_label_count_mismatch() {
        let pipeline = DocumentPipeline::new(FixedLabels(vec!["H1"]));
        let err = pipeline.process_source(&report_source()).unwrap_err();
        assert!(matches!(err, Error::Classify(_)));
    }

    #[test]
    fn test_lenient_skips_bad_page() {
        let pipeline = DocumentPipeline::new(BySize);
        let result = pipeline
            .process_source(&BrokenPage)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.title, "Intro");
        assert!(result.outline.is_empty());
    }

    #[test]
    fn test_reconstruct_lines_follows_error_mode() {
        let reconstructor = LineReconstructor::new();
        let lines = reconstruct_lines(&reconstructor, &BrokenPage, ErrorMode::Lenient).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].page, 1);

        assert!(matches!(
            reconstruct_lines(&reconstructor, &BrokenPage, ErrorMode::Strict),
            Err(Error::PdfParse(_))
        ));
    }

    #[test]
    fn test_strict_fails_bad_page() {
        let pipeline =
            DocumentPipeline::with_options(BySize, PipelineOptions::new().strict());
        assert!(matches!(
            pipeline.process_source(&BrokenPage),
            Err(Error::PdfParse(_))
        ));
    }

    #[test]
    fn test_pages_in_ascending_order() {
        let source = MemoryWordSource::new(vec![
            vec![Word::new("Chapter One", 72.0, 200.0, 100.0, "Helvetica", 16.0)],
            vec![Word::new("Chapter Two", 72.0, 200.0, 50.0, "Helvetica", 16.0)],
        ]);
        let pipeline = DocumentPipeline::new(BySize);
        let result = pipeline.process_source(&source).unwrap().into_result().unwrap();

        let pages: Vec<u32> = result.outline.iter().map(|e| e.page).collect();
        assert_eq!(pages, vec![1, 2]);
        assert_eq!(result.title, "Chapter One");
    }

    #[test]
    fn test_reading_order_option() {
        let source = MemoryWordSource::new(vec![vec![
            Word::new("Background", 72.0, 150.0, 100.0, "Helvetica", 12.0),
            Word::new("Summary", 72.0, 150.0, 200.0, "Helvetica", 12.0),
        ]]);
        let labels = FixedLabels(vec!["H2", "H1"]);

        let level_major = DocumentPipeline::new(labels);
        let result = level_major.process_source(&source).unwrap().into_result().unwrap();
        assert_eq!(result.outline[0].text, "Summary");

        let reading = DocumentPipeline::with_options(
            FixedLabels(vec!["H2", "H1"]),
            PipelineOptions::new().with_outline_order(OutlineOrder::ReadingOrder),
        );
        let result = reading.process_source(&source).unwrap().into_result().unwrap();
        assert_eq!(result.outline[0].text, "Background");
    }
}

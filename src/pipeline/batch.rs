//! Directory batch processing with per-file reports.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::classify::LineClassifier;
use crate::error::{Error, Result};

use super::{DocumentPipeline, ErrorMode};

/// Status of one input file after a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// An outline was written to `output`
    Processed { output: PathBuf },
    /// Nothing was written, e.g. because the document has no text
    Skipped { reason: String },
    /// Processing failed; the batch moved on
    Failed { error: String },
}

/// The outcome for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub status: FileStatus,
}

impl FileReport {
    /// File name of the input, for display.
    pub fn name(&self) -> String {
        self.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}

/// Reports for every file of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Processed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    /// Whether no file failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

/// PDF files directly inside `dir`, sorted by file name.
///
/// The `.pdf` extension is matched case-insensitively. Symlinks are followed;
/// entries that do not resolve to a regular file are ignored.
pub fn list_inputs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && crate::detect::has_pdf_extension(&path) {
            inputs.push(path);
        }
    }
    inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(inputs)
}

/// Path of the JSON output for `input`: `<output_dir>/<stem>.json`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".json");
    output_dir.join(name)
}

impl<C: LineClassifier> DocumentPipeline<C> {
    /// Process every PDF in `input_dir`, writing results into `output_dir`.
    ///
    /// `observer` sees each report in input order. In parallel mode reports
    /// are delivered once all documents have finished. Per-file failures are
    /// recorded and the batch continues, except in strict mode where the
    /// first failure ends the batch with its error.
    pub fn run_batch<P, Q, F>(&self, input_dir: P, output_dir: Q, mut observer: F) -> Result<BatchReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: FnMut(&FileReport),
    {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();

        let inputs = list_inputs(input_dir).map_err(|e| {
            Error::Other(format!("cannot read input directory {}: {}", input_dir.display(), e))
        })?;
        fs::create_dir_all(output_dir).map_err(|e| {
            Error::Other(format!(
                "cannot create output directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;
        log::info!(
            "Processing {} PDF files from {}",
            inputs.len(),
            input_dir.display()
        );

        let mut report = BatchReport::default();
        if self.options.parallel {
            let results: Vec<Result<FileStatus>> = inputs
                .par_iter()
                .map(|input| self.process_file_to(input, output_dir))
                .collect();
            for (input, result) in inputs.into_iter().zip(results) {
                self.settle(input, result, &mut report, &mut observer)?;
            }
        } else {
            for input in inputs {
                let result = self.process_file_to(&input, output_dir);
                self.settle(input, result, &mut report, &mut observer)?;
            }
        }

        log::info!(
            "Batch done: {} processed, {} skipped, {} failed",
            report.processed(),
            report.skipped(),
            report.failed()
        );
        Ok(report)
    }

    fn settle<F: FnMut(&FileReport)>(
        &self,
        input: PathBuf,
        result: Result<FileStatus>,
        report: &mut BatchReport,
        observer: &mut F,
    ) -> Result<()> {
        let (status, error) = match result {
            Ok(status) => (status, None),
            Err(e) => {
                log::warn!("Failed to process {}: {}", input.display(), e);
                (
                    FileStatus::Failed {
                        error: e.to_string(),
                    },
                    Some(e),
                )
            }
        };

        let file = FileReport { input, status };
        observer(&file);
        report.files.push(file);

        match error {
            Some(e) if self.options.error_mode == ErrorMode::Strict => Err(e),
            _ => Ok(()),
        }
    }
}

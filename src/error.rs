//! Errors raised while reading PDFs, loading models and writing results.

use std::io;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading an input or writing an output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No `%PDF-` marker near the start of the file.
    #[error("not a PDF file")]
    UnknownFormat,

    /// The `%PDF-` marker is not followed by a `d.d` version.
    #[error("unsupported PDF version {0:?}")]
    UnsupportedVersion(String),

    /// Broken document structure or content stream.
    #[error("malformed PDF: {0}")]
    PdfParse(String),

    #[error("PDF is encrypted")]
    Encrypted,

    /// Requested page, then the document's page count.
    #[error("page {0} does not exist ({1} pages)")]
    PageOutOfRange(u32, u32),

    /// Classifier or label encoder artifact could not be loaded.
    #[error("cannot load model: {0}")]
    ModelLoad(String),

    /// Classification of a feature table failed.
    #[error("classification failed: {0}")]
    Classify(String),

    #[error("cannot render JSON: {0}")]
    Render(String),

    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            other => Error::PdfParse(other.to_string()),
        }
    }
}

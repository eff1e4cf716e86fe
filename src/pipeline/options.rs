//! Pipeline options and configuration.

pub use crate::layout::LineOrder;
pub use crate::outline::OutlineOrder;

/// Options for processing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOptions {
    /// Order of lines within a page
    pub line_order: LineOrder,

    /// Order of entries in the outline
    pub outline_order: OutlineOrder,

    /// Error handling mode for pages and batch files
    pub error_mode: ErrorMode,

    /// Whether to process batch documents in parallel
    pub parallel: bool,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set line order.
    pub fn with_line_order(mut self, order: LineOrder) -> Self {
        self.line_order = order;
        self
    }

    /// Set outline order.
    pub fn with_outline_order(mut self, order: OutlineOrder) -> Self {
        self.outline_order = order;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Skip unreadable pages and keep going after failed files.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Fail a document on its first unreadable page and stop a batch on its
    /// first failed file.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable parallel processing of batch documents.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Error handling mode during processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    Strict,
    /// Skip invalid content and continue
    #[default]
    Lenient,
}

//! Word sources: where positioned words come from.
//!
//! The pipeline only depends on the [`WordSource`] trait. [`PdfWordSource`]
//! implements it over lopdf by interpreting each page's content stream into
//! glyphs and clustering them into words; [`MemoryWordSource`] serves
//! pre-extracted words.

mod backend;
mod content;
mod words;

pub use backend::{
    decode_fallback, ContentOp, LopdfBackend, Operand, PageFont, PageId, PdfBackend,
};
pub use content::{ContentInterpreter, Glyph};
pub use words::{glyphs_to_words, WordOptions};

use std::collections::BTreeMap;
use std::path::Path;

use crate::detect::sniff_header;
use crate::error::{Error, Result};
use crate::model::Word;

/// Yields the words of a document, one page at a time.
pub trait WordSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Words on a 1-based page.
    fn page_words(&self, page: u32) -> Result<Vec<Word>>;
}

/// Word source over a PDF file.
///
/// The underlying document is owned by the source and released when it is
/// dropped.
pub struct PdfWordSource<B: PdfBackend = LopdfBackend> {
    backend: B,
    pages: BTreeMap<u32, PageId>,
    options: WordOptions,
}

impl PdfWordSource<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = sniff_header(path)?;
        log::debug!("Opening {} ({})", path.display(), header);
        Ok(Self::from_backend(LopdfBackend::load_file(path)?))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::detect::sniff_header_bytes(data)?;
        Ok(Self::from_backend(LopdfBackend::load_bytes(data)?))
    }
}

impl<B: PdfBackend> PdfWordSource<B> {
    /// Wrap an already-loaded backend.
    pub fn from_backend(backend: B) -> Self {
        let pages = backend.pages();
        Self {
            backend,
            pages,
            options: WordOptions::default(),
        }
    }

    /// Set the word clustering tolerances.
    pub fn with_word_options(mut self, options: WordOptions) -> Self {
        self.options = options;
        self
    }

    /// Glyphs shown on a 1-based page, in content order.
    pub fn page_glyphs(&self, page: u32) -> Result<Vec<Glyph>> {
        let page_id = *self
            .pages
            .get(&page)
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))?;

        let fonts = self.backend.page_fonts(page_id)?;
        let content = self.backend.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;
        let height = self.backend.page_height(page_id);

        Ok(ContentInterpreter::new(&self.backend, page_id, height, fonts).run(&ops))
    }
}

impl<B: PdfBackend> WordSource for PdfWordSource<B> {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_words(&self, page: u32) -> Result<Vec<Word>> {
        let glyphs = self.page_glyphs(page)?;
        let words = glyphs_to_words(&glyphs, &self.options);
        log::debug!(
            "Page {}: {} glyphs -> {} words",
            page,
            glyphs.len(),
            words.len()
        );
        Ok(words)
    }
}

/// Word source over words that were extracted elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryWordSource {
    pages: Vec<Vec<Word>>,
}

impl MemoryWordSource {
    /// Create a source from per-page word lists (index 0 is page 1).
    pub fn new(pages: Vec<Vec<Word>>) -> Self {
        Self { pages }
    }

    /// Append a page.
    pub fn push_page(&mut self, words: Vec<Word>) {
        self.pages.push(words);
    }
}

impl WordSource for MemoryWordSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_words(&self, page: u32) -> Result<Vec<Word>> {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(page, self.pages.len() as u32))
    }
}

//! Access to page geometry, fonts and content streams.
//!
//! [`PdfBackend`] is the narrow surface the content interpreter needs from a
//! PDF library. [`LopdfBackend`] implements it over `lopdf`; tests can stub
//! it without building a document.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};

/// Object id of a page: (object number, generation).
pub type PageId = (u32, u16);

/// Page height used when no `MediaBox` can be resolved (US Letter).
pub const DEFAULT_PAGE_HEIGHT: f64 = 792.0;

/// Width, in glyph space units, assumed for codes without metrics.
pub const DEFAULT_GLYPH_WIDTH: f64 = 500.0;

/// Maximum `Parent` hops followed when resolving inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A font resource of one page.
#[derive(Debug, Clone)]
pub struct PageFont {
    /// Resource key used by `Tf`, e.g. `F1`
    pub key: Vec<u8>,
    /// `BaseFont` name, e.g. "Helvetica-Bold"
    pub base_font: String,
    /// Code of the first entry in `widths`
    pub first_char: u32,
    /// Advance widths in thousandths of an em
    pub widths: Vec<f64>,
}

impl PageFont {
    /// Advance width of `code`, or [`DEFAULT_GLYPH_WIDTH`] when unknown or zero.
    pub fn glyph_width(&self, code: u32) -> f64 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }
}

/// Operand of a content stream operator.
#[derive(Debug, Clone)]
pub enum Operand {
    Integer(i64),
    Real(f64),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

impl Operand {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// One operator with its operands.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<Operand>,
}

impl ContentOp {
    pub fn new(operator: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`, if present.
    pub fn number(&self, index: usize) -> Option<f64> {
        self.operands.get(index).and_then(Operand::as_number)
    }
}

/// What word extraction needs from a PDF library.
pub trait PdfBackend {
    /// Pages keyed by 1-based page number.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Page height in points.
    fn page_height(&self, page: PageId) -> f64;

    /// Font resources of a page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<PageFont>>;

    /// Decompressed content of a page; empty for pages without content.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Tokenize content bytes into operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode shown bytes with the encoding of font `font_key`, or with
    /// [`decode_fallback`] when the font has no usable encoding.
    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String;
}

/// Decode string bytes without font information.
///
/// Tries UTF-16BE (with BOM), then UTF-8, then Latin-1.
pub fn decode_fallback(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(_) => bytes.iter().copied().map(char::from).collect(),
    }
}

/// [`PdfBackend`] over a loaded `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            doc: LopdfDocument::load(path)?,
        })
    }

    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            doc: LopdfDocument::load_mem(data)?,
        })
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    fn number(&self, obj: &Object) -> Option<f64> {
        match self.resolve(obj)? {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(f64::from(*r)),
            _ => None,
        }
    }

    /// Page attribute, searched up the page tree when not set on the page.
    fn inherited<'a>(&'a self, page: PageId, key: &[u8]) -> Option<&'a Object> {
        let mut node: &Dictionary = self.doc.get_dictionary(page).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = node.get(key) {
                return self.resolve(value);
            }
            let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn font_widths(&self, font: &Dictionary) -> Vec<f64> {
        match font.get(b"Widths").ok().and_then(|o| self.resolve(o)) {
            Some(Object::Array(widths)) => widths
                .iter()
                .map(|w| self.number(w).unwrap_or(0.0))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn stream_bytes(&self, obj: &Object) -> Option<Vec<u8>> {
        match self.resolve(obj)? {
            // Unfiltered streams have nothing to decompress.
            Object::Stream(s) => Some(
                s.decompressed_content()
                    .unwrap_or_else(|_| s.content.clone()),
            ),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_height(&self, page: PageId) -> f64 {
        let height = match self.inherited(page, b"MediaBox") {
            Some(Object::Array(rect)) if rect.len() >= 4 => self
                .number(&rect[1])
                .zip(self.number(&rect[3]))
                .map(|(lly, ury)| (ury - lly).abs()),
            _ => None,
        };
        height.unwrap_or(DEFAULT_PAGE_HEIGHT)
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<PageFont>> {
        let fonts = self.doc.get_page_fonts(page)?;

        Ok(fonts
            .into_iter()
            .map(|(key, dict)| PageFont {
                base_font: dict
                    .get(b"BaseFont")
                    .and_then(Object::as_name)
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .unwrap_or_default(),
                first_char: dict
                    .get(b"FirstChar")
                    .and_then(Object::as_i64)
                    .ok()
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(0),
                widths: self.font_widths(dict),
                key,
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        let dict = self.doc.get_dictionary(page)?;

        // A page without a content stream is blank, not broken.
        let Ok(contents) = dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let parts: Vec<&Object> = match self.resolve(contents) {
            Some(Object::Array(arr)) => arr.iter().collect(),
            Some(stream @ Object::Stream(_)) => vec![stream],
            _ => {
                return Err(Error::PdfParse(format!(
                    "page {} {} R has invalid Contents",
                    page.0, page.1
                )))
            }
        };

        let mut content = Vec::new();
        for part in parts {
            if let Some(bytes) = self.stream_bytes(part) {
                content.extend_from_slice(&bytes);
                // Keep the last token of one stream apart from the next.
                content.push(b'\n');
            }
        }
        Ok(content)
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content = lopdf::content::Content::decode(data)?;
        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp::new(op.operator, op.operands.iter().map(to_operand).collect()))
            .collect())
    }

    fn decode_text(&self, page: PageId, font_key: &[u8], bytes: &[u8]) -> String {
        self.doc
            .get_page_fonts(page)
            .ok()
            .and_then(|fonts| {
                let encoding = fonts.get(font_key)?.get_font_encoding(&self.doc).ok()?;
                LopdfDocument::decode_text(&encoding, bytes).ok()
            })
            .unwrap_or_else(|| decode_fallback(bytes))
    }
}

fn to_operand(obj: &Object) -> Operand {
    match obj {
        Object::Integer(i) => Operand::Integer(*i),
        Object::Real(r) => Operand::Real(f64::from(*r)),
        Object::Name(n) => Operand::Name(n.clone()),
        Object::String(s, _) => Operand::Str(s.clone()),
        Object::Array(items) => Operand::Array(items.iter().map(to_operand).collect()),
        _ => Operand::Other,
    }
}

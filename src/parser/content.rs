//! Content stream interpretation: text-showing operators to positioned glyphs.

use std::collections::HashMap;

use super::backend::{ContentOp, Operand, PageFont, PageId, PdfBackend, DEFAULT_GLYPH_WIDTH};

/// Fraction of the font size above the baseline treated as the glyph top.
const ASCENT_RATIO: f64 = 0.8;

/// A single shown character with its page-space box.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x0: f64,
    pub x1: f64,
    /// Distance from the top of the page to the top of the glyph
    pub top: f64,
    pub fontname: String,
    pub size: f64,
}

/// Affine transform `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Length of the transformed unit vertical vector.
    fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn from_operands(op: &ContentOp) -> Option<Matrix> {
        Some(Matrix::new(
            op.number(0)?,
            op.number(1)?,
            op.number(2)?,
            op.number(3)?,
            op.number(4)?,
            op.number(5)?,
        ))
    }
}

/// Text state parameters (PDF 32000-1 §9.3).
#[derive(Debug, Clone)]
struct TextState {
    font_key: Vec<u8>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    horizontal_scale: f64,
    leading: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
        }
    }
}

/// Walks a page's content operations and records every shown glyph.
pub struct ContentInterpreter<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    page: PageId,
    page_height: f64,
    fonts: HashMap<Vec<u8>, PageFont>,
}

impl<'a, B: PdfBackend + ?Sized> ContentInterpreter<'a, B> {
    pub fn new(
        backend: &'a B,
        page: PageId,
        page_height: f64,
        fonts: Vec<PageFont>,
    ) -> Self {
        Self {
            backend,
            page,
            page_height,
            fonts: fonts.into_iter().map(|f| (f.key.clone(), f)).collect(),
        }
    }

    /// Interpret the operations and return glyphs in content order.
    pub fn run(&self, ops: &[ContentOp]) -> Vec<Glyph> {
        let mut glyphs = Vec::new();
        let mut ctm = Matrix::IDENTITY;
        let mut ctm_stack: Vec<Matrix> = Vec::new();
        let mut state = TextState::default();
        let mut state_stack: Vec<TextState> = Vec::new();
        let mut tm = Matrix::IDENTITY;
        let mut tlm = Matrix::IDENTITY;

        for op in ops {
            match op.operator.as_str() {
                "q" => {
                    ctm_stack.push(ctm);
                    state_stack.push(state.clone());
                }
                "Q" => {
                    if let Some(saved) = ctm_stack.pop() {
                        ctm = saved;
                    }
                    if let Some(saved) = state_stack.pop() {
                        state = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(op) {
                        ctm = m.then(&ctm);
                    }
                }
                "BT" => {
                    tm = Matrix::IDENTITY;
                    tlm = Matrix::IDENTITY;
                }
                "Tf" => {
                    if let Some(Operand::Name(name)) = op.operands.first() {
                        state.font_key = name.clone();
                    }
                    if let Some(size) = op.number(1) {
                        state.font_size = size;
                    }
                }
                "Tc" => state.char_spacing = op.number(0).unwrap_or(0.0),
                "Tw" => state.word_spacing = op.number(0).unwrap_or(0.0),
                "Tz" => state.horizontal_scale = op.number(0).unwrap_or(100.0) / 100.0,
                "TL" => state.leading = op.number(0).unwrap_or(0.0),
                "Td" | "TD" => {
                    let tx = op.number(0).unwrap_or(0.0);
                    let ty = op.number(1).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    tlm = Matrix::translation(tx, ty).then(&tlm);
                    tm = tlm;
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(op) {
                        tlm = m;
                        tm = m;
                    }
                }
                "T*" => {
                    tlm = Matrix::translation(0.0, -state.leading).then(&tlm);
                    tm = tlm;
                }
                "Tj" => {
                    if let Some(Operand::Str(bytes)) = op.operands.first() {
                        self.show(bytes, &state, &mut tm, &ctm, &mut glyphs);
                    }
                }
                "TJ" => {
                    if let Some(Operand::Array(items)) = op.operands.first() {
                        for item in items {
                            match item {
                                Operand::Str(bytes) => {
                                    self.show(bytes, &state, &mut tm, &ctm, &mut glyphs)
                                }
                                other => {
                                    if let Some(n) = other.as_number() {
                                        let tx = -n / 1000.0
                                            * state.font_size
                                            * state.horizontal_scale;
                                        tm = Matrix::translation(tx, 0.0).then(&tm);
                                    }
                                }
                            }
                        }
                    }
                }
                "'" | "\"" => {
                    let text_idx = if op.operator == "\"" {
                        state.word_spacing = op.number(0).unwrap_or(state.word_spacing);
                        state.char_spacing = op.number(1).unwrap_or(state.char_spacing);
                        2
                    } else {
                        0
                    };
                    tlm = Matrix::translation(0.0, -state.leading).then(&tlm);
                    tm = tlm;
                    if let Some(Operand::Str(bytes)) = op.operands.get(text_idx) {
                        self.show(bytes, &state, &mut tm, &ctm, &mut glyphs);
                    }
                }
                _ => {}
            }
        }

        glyphs
    }

    /// Show one string: decode it, emit a glyph per character, advance `tm`.
    fn show(
        &self,
        bytes: &[u8],
        state: &TextState,
        tm: &mut Matrix,
        ctm: &Matrix,
        out: &mut Vec<Glyph>,
    ) {
        let text = self.backend.decode_text(self.page, &state.font_key, bytes);
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return;
        }

        let font = self.fonts.get(&state.font_key);
        let fontname = font
            .map(|f| f.base_font.clone())
            .unwrap_or_else(|| String::from_utf8_lossy(&state.font_key).to_string());

        for (ch, code_width, is_space_code) in glyph_metrics(&chars, bytes, font) {
            let trm = tm.then(ctm);
            let size = state.font_size * trm.vertical_scale();
            let start_x = trm.e;
            let baseline = trm.f;

            let mut advance = code_width / 1000.0 * state.font_size + state.char_spacing;
            if is_space_code {
                advance += state.word_spacing;
            }
            *tm = Matrix::translation(advance * state.horizontal_scale, 0.0).then(tm);
            let end_x = tm.then(ctm).e;

            out.push(Glyph {
                ch,
                x0: start_x.min(end_x),
                x1: start_x.max(end_x),
                top: self.page_height - (baseline + size * ASCENT_RATIO),
                fontname: fontname.clone(),
                size,
            });
        }
    }
}

/// Pair decoded characters with the width of the code that produced them.
///
/// Single-byte fonts map one byte to one character. When byte and
/// character counts disagree, two-byte codes are assumed if they line up,
/// otherwise the total single-byte advance is spread evenly.
fn glyph_metrics(
    chars: &[char],
    bytes: &[u8],
    font: Option<&PageFont>,
) -> Vec<(char, f64, bool)> {
    let width = |code: u32| {
        font.map(|f| f.glyph_width(code))
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    };

    if chars.len() == bytes.len() {
        return chars
            .iter()
            .zip(bytes)
            .map(|(&ch, &code)| (ch, width(u32::from(code)), code == b' '))
            .collect();
    }

    if bytes.len() == chars.len() * 2 {
        return chars
            .iter()
            .map(|&ch| (ch, DEFAULT_GLYPH_WIDTH, false))
            .collect();
    }

    let total: f64 = bytes.iter().map(|&b| width(u32::from(b))).sum();
    let each = total / chars.len() as f64;
    chars
        .iter()
        .map(|&ch| (ch, each, ch == ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use std::collections::BTreeMap;

    /// Backend that decodes bytes as Latin-1 and has no document behind it.
    struct PlainBackend;

    impl PdfBackend for PlainBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            BTreeMap::new()
        }
        fn page_height(&self, _page: PageId) -> f64 {
            800.0
        }
        fn page_fonts(&self, _page: PageId) -> Result<Vec<PageFont>> {
            Ok(vec![])
        }
        fn page_content(&self, _page: PageId) -> Result<Vec<u8>> {
            Ok(vec![])
        }
        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(vec![])
        }
        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            bytes.iter().map(|&b| b as char).collect()
        }
    }

    fn font(name: &str, base: &str) -> PageFont {
        PageFont {
            key: name.as_bytes().to_vec(),
            base_font: base.to_string(),
            first_char: 0,
            widths: vec![],
        }
    }

    fn num(n: f64) -> Operand {
        Operand::Real(n)
    }

    fn ops_showing(text: &str) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![Operand::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("Td", vec![num(100.0), num(700.0)]),
            ContentOp::new("Tj", vec![Operand::Str(text.as_bytes().to_vec())]),
            ContentOp::new("ET", vec![]),
        ]
    }

    #[test]
    fn test_glyph_positions() {
        let backend = PlainBackend;
        let interp =
            ContentInterpreter::new(&backend, (1, 0), 800.0, vec![font("F1", "Helvetica-Bold")]);
        let glyphs = interp.run(&ops_showing("Hi"));

        assert_eq!(glyphs.len(), 2);
        // Default width 500/1000 em at 10pt = 5pt per glyph.
        assert!((glyphs[0].x0 - 100.0).abs() < 1e-9);
        assert!((glyphs[0].x1 - 105.0).abs() < 1e-9);
        assert!((glyphs[1].x0 - 105.0).abs() < 1e-9);
        assert!((glyphs[0].top - (800.0 - 708.0)).abs() < 1e-9);
        assert_eq!(glyphs[0].fontname, "Helvetica-Bold");
        assert_eq!(glyphs[0].size, 10.0);
    }

    #[test]
    fn test_tj_kerning_moves_pen() {
        let backend = PlainBackend;
        let interp = ContentInterpreter::new(&backend, (1, 0), 800.0, vec![font("F1", "Times")]);
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![Operand::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new(
                "TJ",
                vec![Operand::Array(vec![
                    Operand::Str(b"A".to_vec()),
                    Operand::Integer(-1000),
                    Operand::Str(b"B".to_vec()),
                ])],
            ),
            ContentOp::new("ET", vec![]),
        ];
        let glyphs = interp.run(&ops);
        assert_eq!(glyphs.len(), 2);
        // A ends at 5, the -1000 adjustment adds 10 more before B.
        assert!((glyphs[1].x0 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_cm_scales_font_size() {
        let backend = PlainBackend;
        let interp = ContentInterpreter::new(&backend, (1, 0), 800.0, vec![font("F1", "Times")]);
        let mut ops = vec![ContentOp::new(
            "cm",
            vec![num(2.0), num(0.0), num(0.0), num(2.0), num(0.0), num(0.0)],
        )];
        ops.extend(ops_showing("X"));
        let glyphs = interp.run(&ops);
        assert_eq!(glyphs[0].size, 20.0);
        assert!((glyphs[0].x0 - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_q_restores_state() {
        let backend = PlainBackend;
        let interp = ContentInterpreter::new(&backend, (1, 0), 800.0, vec![font("F1", "Times")]);
        let mut ops = vec![
            ContentOp::new("q", vec![]),
            ContentOp::new(
                "cm",
                vec![num(3.0), num(0.0), num(0.0), num(3.0), num(0.0), num(0.0)],
            ),
            ContentOp::new("Q", vec![]),
        ];
        ops.extend(ops_showing("X"));
        let glyphs = interp.run(&ops);
        assert_eq!(glyphs[0].size, 10.0);
    }

    #[test]
    fn test_next_line_uses_leading() {
        let backend = PlainBackend;
        let interp = ContentInterpreter::new(&backend, (1, 0), 800.0, vec![font("F1", "Times")]);
        let ops = vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![Operand::Name(b"F1".to_vec()), num(10.0)]),
            ContentOp::new("TD", vec![num(50.0), num(-14.0)]),
            ContentOp::new("Tj", vec![Operand::Str(b"a".to_vec())]),
            ContentOp::new("T*", vec![]),
            ContentOp::new("Tj", vec![Operand::Str(b"b".to_vec())]),
            ContentOp::new("ET", vec![]),
        ];
        let glyphs = interp.run(&ops);
        assert!((glyphs[1].top - glyphs[0].top - 14.0).abs() < 1e-9);
        assert!((glyphs[1].x0 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_glyph_metrics_fallbacks() {
        let chars: Vec<char> = "ab".chars().collect();
        let two_byte = glyph_metrics(&chars, &[0, 1, 0, 2], None);
        assert_eq!(two_byte.len(), 2);
        assert_eq!(two_byte[0].1, DEFAULT_GLYPH_WIDTH);

        let ligature: Vec<char> = "ffi".chars().collect();
        let spread = glyph_metrics(&ligature, &[1], None);
        assert_eq!(spread.len(), 3);
        assert!((spread[0].1 - DEFAULT_GLYPH_WIDTH / 3.0).abs() < 1e-9);
    }
}

//! Clustering of glyphs into words.

use crate::model::Word;

use super::content::Glyph;

/// Tolerances used when clustering glyphs into words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal gap between glyphs of the same word
    pub x_tolerance: f64,
    /// Maximum `top` difference between glyphs on the same row
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// Cluster glyphs into words.
///
/// Glyphs are first grouped into rows of similar `top`, each row is read
/// left to right, and a word ends at whitespace, at a horizontal gap wider
/// than `x_tolerance`, or where the font name or size changes. Words come
/// out row by row, top to bottom.
pub fn glyphs_to_words(glyphs: &[Glyph], options: &WordOptions) -> Vec<Word> {
    let mut sorted: Vec<&Glyph> = glyphs.iter().collect();
    sorted.sort_by(|a, b| a.top.total_cmp(&b.top));

    let mut rows: Vec<Vec<&Glyph>> = Vec::new();
    for glyph in sorted {
        let same_row = rows
            .last()
            .and_then(|row| row.last())
            .map(|prev| glyph.top - prev.top <= options.y_tolerance)
            .unwrap_or(false);
        match rows.last_mut() {
            Some(row) if same_row => row.push(glyph),
            _ => rows.push(vec![glyph]),
        }
    }

    let mut words = Vec::new();
    for mut row in rows {
        row.sort_by(|a, b| a.x0.total_cmp(&b.x0));

        let mut current: Vec<&Glyph> = Vec::new();
        for glyph in row {
            if glyph.ch.is_whitespace() {
                flush(&mut current, &mut words);
                continue;
            }
            if let Some(prev) = current.last() {
                let gap = glyph.x0 - prev.x1;
                let restyled = glyph.fontname != prev.fontname
                    || (glyph.size - prev.size).abs() > f64::EPSILON;
                if gap > options.x_tolerance || restyled {
                    flush(&mut current, &mut words);
                }
            }
            current.push(glyph);
        }
        flush(&mut current, &mut words);
    }

    words
}

fn flush(current: &mut Vec<&Glyph>, words: &mut Vec<Word>) {
    let Some(first) = current.first() else {
        return;
    };

    let text: String = current.iter().map(|g| g.ch).collect();
    let x0 = current.iter().map(|g| g.x0).fold(f64::INFINITY, f64::min);
    let x1 = current.iter().map(|g| g.x1).fold(f64::NEG_INFINITY, f64::max);
    let top = current.iter().map(|g| g.top).fold(f64::INFINITY, f64::min);

    words.push(Word::new(
        text,
        x0,
        x1,
        top,
        first.fontname.clone(),
        first.size,
    ));
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char, x0: f64, top: f64) -> Glyph {
        Glyph {
            ch,
            x0,
            x1: x0 + 5.0,
            top,
            fontname: "Helvetica".to_string(),
            size: 10.0,
        }
    }

    fn layout(text: &str, x0: f64, top: f64) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| glyph(ch, x0 + i as f64 * 5.0, top))
            .collect()
    }

    fn texts(words: &[Word]) -> Vec<&str> {
        words.iter().map(|w| w.text.as_str()).collect()
    }

    #[test]
    fn test_split_on_spaces() {
        let words = glyphs_to_words(&layout("Project Report", 72.0, 90.0), &WordOptions::default());
        assert_eq!(texts(&words), vec!["Project", "Report"]);
        assert_eq!(words[0].x0, 72.0);
        assert_eq!(words[0].x1, 72.0 + 7.0 * 5.0);
        assert_eq!(words[1].x0, 72.0 + 8.0 * 5.0);
    }

    #[test]
    fn test_split_on_gap() {
        let mut glyphs = layout("ab", 0.0, 10.0);
        glyphs.extend(layout("cd", 13.5, 10.0));
        let words = glyphs_to_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&words), vec!["ab", "cd"]);

        let mut glyphs = layout("ab", 0.0, 10.0);
        glyphs.extend(layout("cd", 12.0, 10.0));
        let words = glyphs_to_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&words), vec!["abcd"]);
    }

    #[test]
    fn test_split_on_font_change() {
        let mut glyphs = layout("1.", 0.0, 10.0);
        let mut bold = layout("Intro", 10.0, 10.0);
        for g in &mut bold {
            g.fontname = "Helvetica-Bold".to_string();
        }
        glyphs.extend(bold);
        let words = glyphs_to_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&words), vec!["1.", "Intro"]);
        assert_eq!(words[1].fontname, "Helvetica-Bold");
    }

    #[test]
    fn test_rows_read_top_to_bottom() {
        let mut glyphs = layout("second", 0.0, 200.0);
        glyphs.extend(layout("first", 0.0, 100.0));
        glyphs.extend(layout("jitter", 50.0, 101.0));
        let words = glyphs_to_words(&glyphs, &WordOptions::default());
        assert_eq!(texts(&words), vec!["first", "jitter", "second"]);
        assert_eq!(words[1].top, 101.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(glyphs_to_words(&[], &WordOptions::default()).is_empty());
    }
}

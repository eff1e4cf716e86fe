//! Per-line feature extraction.

use regex::Regex;

use crate::model::{FeatureRecord, Line, Word};

/// Font size assumed when no word in a line reports one.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Substring of a font name that marks it as bold.
const BOLD_MARKER: &str = "Bold";

/// Computes the [`Line`] fields from a group of words.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    numbered: Regex,
}

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self {
            // Section-number prefix: "1", "1.2", "3.4.5"; the rest of the line is free.
            numbered: Regex::new(r"^\d+(\.\d+)*").expect("numbering pattern is valid"),
        }
    }

    /// Build a line record from already-joined text and its word group.
    pub fn extract(&self, text: String, page: u32, y_position: f64, words: &[&Word]) -> Line {
        let text_length = text.chars().count();
        Line {
            page,
            font_size: mean_font_size(words),
            y_position,
            x_position: leftmost(words),
            is_bold: is_bold(words),
            uppercase_ratio: uppercase_ratio(&text),
            text_length,
            is_numbered: self.is_numbered(&text),
            text,
        }
    }

    /// Whether the text starts with a decimal section number.
    pub fn is_numbered(&self, text: &str) -> bool {
        self.numbered.is_match(text)
    }

    /// Classifier rows for a batch of lines, in line order.
    pub fn feature_table(&self, lines: &[Line]) -> Vec<FeatureRecord> {
        lines.iter().map(Line::features).collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Arithmetic mean of the reported font sizes.
pub fn mean_font_size(words: &[&Word]) -> f64 {
    let sizes: Vec<f64> = words.iter().filter_map(|w| w.size).collect();
    if sizes.is_empty() {
        return DEFAULT_FONT_SIZE;
    }
    sizes.iter().sum::<f64>() / sizes.len() as f64
}

/// True if any word's font name carries the bold marker (case-sensitive).
pub fn is_bold(words: &[&Word]) -> bool {
    words.iter().any(|w| w.fontname.contains(BOLD_MARKER))
}

/// Fraction of characters that are uppercase letters.
pub fn uppercase_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f64 / total as f64
}

/// Minimum `x0` of the group, 0 when empty.
pub fn leftmost(words: &[&Word]) -> f64 {
    words
        .iter()
        .map(|w| w.x0)
        .min_by(|a, b| a.total_cmp(b))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f64, font: &str, size: Option<f64>) -> Word {
        Word {
            text: text.to_string(),
            x0,
            x1: x0 + 10.0,
            top: 50.0,
            fontname: font.to_string(),
            size,
        }
    }

    #[test]
    fn test_is_numbered() {
        let fx = FeatureExtractor::new();
        assert!(fx.is_numbered("1"));
        assert!(fx.is_numbered("2.3"));
        assert!(fx.is_numbered("10.20.30"));
        assert!(fx.is_numbered("1. Overview"));
        assert!(fx.is_numbered("3.4.5 Results"));
        assert!(!fx.is_numbered("Introduction"));
        assert!(!fx.is_numbered("A.1"));
        assert!(!fx.is_numbered(" 1 leading space"));
    }

    #[test]
    fn test_uppercase_ratio_bounds() {
        assert_eq!(uppercase_ratio("ABC"), 1.0);
        assert_eq!(uppercase_ratio("abc"), 0.0);
        assert_eq!(uppercase_ratio("12 34"), 0.0);
        assert!((uppercase_ratio("Ab") - 0.5).abs() < 1e-12);
        assert_eq!(uppercase_ratio(""), 0.0);

        for text in ["Hello World", "ÉCOLE normale", "1.2 SCOPE", "ß", "ΑΒγ"] {
            let ratio = uppercase_ratio(text);
            assert!((0.0..=1.0).contains(&ratio), "{text}: {ratio}");
        }
    }

    #[test]
    fn test_mean_font_size_defaults() {
        let a = word("a", 0.0, "Helvetica", Some(10.0));
        let b = word("b", 20.0, "Helvetica", Some(14.0));
        let c = word("c", 40.0, "Helvetica", None);
        assert_eq!(mean_font_size(&[&a, &b, &c]), 12.0);
        assert_eq!(mean_font_size(&[&a]), 10.0);
        assert_eq!(mean_font_size(&[&c]), DEFAULT_FONT_SIZE);
        assert_eq!(mean_font_size(&[]), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_bold_marker_is_case_sensitive() {
        let bold = word("a", 0.0, "ABCDEF+Arial-BoldMT", Some(12.0));
        let lower = word("a", 0.0, "Arial-bold", Some(12.0));
        let plain = word("a", 0.0, "Arial", Some(12.0));
        assert!(is_bold(&[&plain, &bold]));
        assert!(!is_bold(&[&lower]));
        assert!(!is_bold(&[&plain]));
    }

    #[test]
    fn test_extract_line() {
        let fx = FeatureExtractor::new();
        let a = word("1.", 80.0, "Times-Bold", Some(14.0));
        let b = word("Overview", 72.5, "Times-Roman", Some(14.0));
        let line = fx.extract("1. Overview".to_string(), 2, 101.3, &[&a, &b]);

        assert_eq!(line.page, 2);
        assert_eq!(line.text_length, 11);
        assert_eq!(line.x_position, 72.5);
        assert_eq!(line.y_position, 101.3);
        assert_eq!(line.font_size, 14.0);
        assert!(line.is_bold);
        assert!(line.is_numbered);
        assert!((line.uppercase_ratio - 1.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_leftmost_empty() {
        assert_eq!(leftmost(&[]), 0.0);
    }
}

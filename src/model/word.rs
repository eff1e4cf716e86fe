//! Positioned words as delivered by a word source.

use serde::{Deserialize, Serialize};

/// A single word on a page with its horizontal extent and typography.
///
/// Coordinates are page-relative points with `top` measured downward from
/// the top edge of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The word text
    pub text: String,
    /// Left edge
    pub x0: f64,
    /// Right edge
    pub x1: f64,
    /// Distance from the top of the page to the top of the word
    pub top: f64,
    /// Font name (e.g., "Helvetica-Bold")
    pub fontname: String,
    /// Font size in points, when the source reports one
    pub size: Option<f64>,
}

impl Word {
    /// Create a new word with a known font size.
    pub fn new(
        text: impl Into<String>,
        x0: f64,
        x1: f64,
        top: f64,
        fontname: impl Into<String>,
        size: f64,
    ) -> Self {
        Self {
            text: text.into(),
            x0,
            x1,
            top,
            fontname: fontname.into(),
            size: Some(size),
        }
    }

    /// Drop the font size, as some sources do not report one.
    pub fn without_size(mut self) -> Self {
        self.size = None;
        self
    }

    /// Horizontal distance from the right edge of `self` to the left edge of `next`.
    pub fn gap_to(&self, next: &Word) -> f64 {
        next.x0 - self.x1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_to() {
        let a = Word::new("Hello", 10.0, 40.0, 100.0, "Helvetica", 12.0);
        let b = Word::new("World", 43.5, 70.0, 100.0, "Helvetica", 12.0);
        assert!((a.gap_to(&b) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_without_size() {
        let w = Word::new("x", 0.0, 1.0, 0.0, "F1", 9.0).without_size();
        assert_eq!(w.size, None);
    }
}

//! Reconstructed lines, their classifier features, and predicted labels.

use serde::{Deserialize, Serialize};

/// Names of the classifier input columns, in the order the model expects.
pub const FEATURE_COLUMNS: [&str; 6] = [
    "font_size",
    "y_position",
    "x_position",
    "text_length",
    "uppercase_ratio",
    "is_bold",
];

/// A reconstructed line of text on one page.
///
/// Built once per group of words sharing a rounded vertical position and
/// never mutated afterwards. `text_length` is always at least 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Trimmed, spaced line text
    pub text: String,
    /// 1-based page number
    pub page: u32,
    /// Mean font size of the constituent words (12.0 if none reported)
    pub font_size: f64,
    /// Rounded `top` coordinate (one decimal) used as the grouping key
    pub y_position: f64,
    /// Leftmost `x0` among the words
    pub x_position: f64,
    /// Whether any word uses a bold font
    pub is_bold: bool,
    /// Fraction of characters that are uppercase letters
    pub uppercase_ratio: f64,
    /// Number of characters in `text`
    pub text_length: usize,
    /// Whether `text` starts with a section number such as "2.3"
    pub is_numbered: bool,
}

impl Line {
    /// The classifier input row for this line.
    pub fn features(&self) -> FeatureRecord {
        FeatureRecord {
            font_size: self.font_size,
            y_position: self.y_position,
            x_position: self.x_position,
            text_length: self.text_length,
            uppercase_ratio: self.uppercase_ratio,
            is_bold: self.is_bold,
        }
    }
}

/// The six-field summary of a line fed to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub font_size: f64,
    pub y_position: f64,
    pub x_position: f64,
    pub text_length: usize,
    pub uppercase_ratio: f64,
    pub is_bold: bool,
}

impl FeatureRecord {
    /// Numeric row in [`FEATURE_COLUMNS`] order (booleans as 0/1).
    pub fn to_row(&self) -> [f64; 6] {
        [
            self.font_size,
            self.y_position,
            self.x_position,
            self.text_length as f64,
            self.uppercase_ratio,
            if self.is_bold { 1.0 } else { 0.0 },
        ]
    }
}

/// A line together with the label the classifier assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    #[serde(flatten)]
    pub line: Line,
    pub predicted_label: String,
}

impl ClassifiedLine {
    pub fn new(line: Line, predicted_label: impl Into<String>) -> Self {
        Self {
            line,
            predicted_label: predicted_label.into(),
        }
    }
}

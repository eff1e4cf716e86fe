//! Outline output types.

use serde::{Deserialize, Serialize};

/// Document title used when page 1 yields no lines.
pub const UNTITLED: &str = "Untitled Document";

/// Heading depth predicted for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// All levels in outline order.
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Parse a classifier label. Labels other than "H1"/"H2"/"H3" are not headings.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "H1" => Some(HeadingLevel::H1),
            "H2" => Some(HeadingLevel::H2),
            "H3" => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    /// Label string for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// The result emitted for one processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl DocumentResult {
    /// Number of headings of the given level.
    pub fn count_level(&self, level: HeadingLevel) -> usize {
        self.outline.iter().filter(|e| e.level == level).count()
    }
}

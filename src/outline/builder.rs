//! Outline assembly from classified lines.

use crate::model::{ClassifiedLine, HeadingLevel, OutlineEntry};

/// Order of entries in the assembled outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineOrder {
    /// Every H1 first, then every H2, then every H3, each in processing order.
    #[default]
    LevelMajor,
    /// Processing order (page ascending), levels interleaved.
    ReadingOrder,
}

/// Collects heading lines into outline entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineBuilder {
    order: OutlineOrder,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: OutlineOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> OutlineOrder {
        self.order
    }

    /// Build the outline. Lines not labelled H1, H2 or H3 are left out.
    pub fn build(&self, lines: &[ClassifiedLine]) -> Vec<OutlineEntry> {
        match self.order {
            OutlineOrder::LevelMajor => HeadingLevel::ALL
                .iter()
                .flat_map(|&level| {
                    lines
                        .iter()
                        .filter(move |l| HeadingLevel::from_label(&l.predicted_label) == Some(level))
                        .map(move |l| entry(level, l))
                })
                .collect(),
            OutlineOrder::ReadingOrder => {
                let mut entries: Vec<OutlineEntry> = lines
                    .iter()
                    .filter_map(|l| {
                        HeadingLevel::from_label(&l.predicted_label).map(|level| entry(level, l))
                    })
                    .collect();
                // Stable, so intra-page processing order is kept.
                entries.sort_by_key(|e| e.page);
                entries
            }
        }
    }
}

fn entry(level: HeadingLevel, line: &ClassifiedLine) -> OutlineEntry {
    OutlineEntry {
        level,
        text: line.line.text.trim().to_string(),
        page: line.line.page,
    }
}

//! Grouping of positioned words into visual text lines.

use std::collections::HashMap;

use crate::model::{Line, Word};

use super::FeatureExtractor;

/// Gap (in layout units) below which adjacent words are joined without a space.
pub const DEFAULT_SPACE_GAP: f64 = 2.0;

/// Shortest line text, in characters, that is kept.
const MIN_LINE_CHARS: usize = 2;

/// Order in which the lines of a page are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineOrder {
    /// The order in which each rounded `top` value was first seen.
    FirstSeen,
    /// Ascending `y_position` (top of the page first); ties keep first-seen order.
    #[default]
    TopToBottom,
}

/// Words sharing one rounded `top` value.
#[derive(Debug, Clone)]
pub struct WordGroup<'a> {
    /// `top` rounded to tenths, as an integer count of tenths
    pub key: i64,
    /// Words in the group, sorted left to right once the group is complete
    pub words: Vec<&'a Word>,
}

impl WordGroup<'_> {
    /// The rounded `top` coordinate of this group.
    pub fn y_position(&self) -> f64 {
        self.key as f64 / 10.0
    }
}

/// Groups words into lines and joins them with reconstructed spacing.
#[derive(Debug, Clone)]
pub struct LineReconstructor {
    space_gap: f64,
    order: LineOrder,
    features: FeatureExtractor,
}

impl LineReconstructor {
    /// Create a reconstructor with the default spacing gap and top-to-bottom order.
    pub fn new() -> Self {
        Self {
            space_gap: DEFAULT_SPACE_GAP,
            order: LineOrder::default(),
            features: FeatureExtractor::new(),
        }
    }

    /// Set the gap below which words are concatenated without a space.
    pub fn with_space_gap(mut self, gap: f64) -> Self {
        self.space_gap = gap;
        self
    }

    /// Set the line emission order.
    pub fn with_order(mut self, order: LineOrder) -> Self {
        self.order = order;
        self
    }

    /// The configured line order.
    pub fn order(&self) -> LineOrder {
        self.order
    }

    /// The feature extractor applied to each reconstructed line.
    pub fn features(&self) -> &FeatureExtractor {
        &self.features
    }

    /// Group words by rounded `top`, preserving first-seen key order.
    ///
    /// Two lines whose tops round to the same tenth are merged, and tops
    /// that differ by less than 0.1 but round apart are split.
    pub fn group_words<'a>(&self, words: &'a [Word]) -> Vec<WordGroup<'a>> {
        let mut groups: Vec<WordGroup<'a>> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for word in words {
            let key = round_key(word.top);
            match index.get(&key) {
                Some(&i) => groups[i].words.push(word),
                None => {
                    index.insert(key, groups.len());
                    groups.push(WordGroup {
                        key,
                        words: vec![word],
                    });
                }
            }
        }

        for group in &mut groups {
            group.words.sort_by(|a, b| a.x0.total_cmp(&b.x0));
        }

        groups
    }

    /// Join a left-to-right sorted group into line text.
    ///
    /// A word whose gap to the previous word is below the spacing gap is
    /// appended directly; otherwise a single space separates them.
    pub fn join_words(&self, words: &[&Word]) -> String {
        let mut text = String::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 && words[i - 1].gap_to(word) >= self.space_gap {
                text.push(' ');
            }
            text.push_str(&word.text);
        }
        text.trim().to_string()
    }

    /// Reconstruct the lines of one page.
    pub fn reconstruct_page(&self, page: u32, words: &[Word]) -> Vec<Line> {
        let mut lines: Vec<Line> = self
            .group_words(words)
            .into_iter()
            .filter_map(|group| {
                let text = self.join_words(&group.words);
                if text.chars().count() < MIN_LINE_CHARS {
                    return None;
                }
                Some(
                    self.features
                        .extract(text, page, group.y_position(), &group.words),
                )
            })
            .collect();

        if self.order == LineOrder::TopToBottom {
            lines.sort_by(|a, b| a.y_position.total_cmp(&b.y_position));
        }

        log::debug!(
            "Page {}: {} words -> {} lines",
            page,
            words.len(),
            lines.len()
        );

        lines
    }
}

impl Default for LineReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

/// Round a coordinate to one decimal place, expressed in tenths.
///
/// Rounds the exact binary value half to even, so 72.85 (stored just below
/// the midpoint) keys as 72.8. Scaling by ten first would round it up.
fn round_key(top: f64) -> i64 {
    let rounded = format!("{:.1}", top).parse::<f64>().unwrap_or(top);
    (rounded * 10.0).round() as i64
}

//! Title selection from first-page lines.

use std::cmp::Ordering;

use crate::model::{Line, UNTITLED};

/// Picks the document title from the lines of page 1.
///
/// Candidates are ranked by font size, then boldness, then text length,
/// all descending. The earliest line wins an exact tie.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleSelector;

impl TitleSelector {
    pub fn new() -> Self {
        Self
    }

    /// Select a title, falling back to [`UNTITLED`] when page 1 has no lines.
    pub fn select<'a, I>(&self, lines: I) -> String
    where
        I: IntoIterator<Item = &'a Line>,
    {
        let mut best: Option<&Line> = None;
        for line in lines.into_iter().filter(|l| l.page == 1) {
            match best {
                Some(current) if rank(line, current) != Ordering::Greater => {}
                _ => best = Some(line),
            }
        }

        best.map(|l| l.text.trim().to_string())
            .unwrap_or_else(|| UNTITLED.to_string())
    }
}

/// Select a title with the default [`TitleSelector`].
pub fn select_title<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a Line>,
{
    TitleSelector::new().select(lines)
}

fn rank(a: &Line, b: &Line) -> Ordering {
    a.font_size
        .total_cmp(&b.font_size)
        .then(a.is_bold.cmp(&b.is_bold))
        .then(a.text_length.cmp(&b.text_length))
}

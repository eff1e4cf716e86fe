//! Title selection and outline assembly.

mod builder;
mod title;

pub use builder::{OutlineBuilder, OutlineOrder};
pub use title::{select_title, TitleSelector};

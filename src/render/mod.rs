//! Rendering of outline results.

mod json;

pub use json::{to_json, write_result, JsonFormat};

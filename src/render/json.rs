//! JSON rendering of outline results.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::DocumentResult;

const INDENT: &[u8] = b"    ";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any value to JSON. Non-ASCII characters are written literally.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let mut buf = Vec::new();
    let result = match format {
        JsonFormat::Pretty => {
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
            value.serialize(&mut ser)
        }
        JsonFormat::Compact => serde_json::to_writer(&mut buf, value),
    };
    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;

    String::from_utf8(buf).map_err(|e| Error::Render(format!("JSON is not UTF-8: {}", e)))
}

/// Write a document result as pretty JSON, without a trailing newline.
pub fn write_result<P: AsRef<Path>>(result: &DocumentResult, path: P) -> Result<()> {
    let json = to_json(result, JsonFormat::Pretty)?;
    fs::write(path, json)?;
    Ok(())
}

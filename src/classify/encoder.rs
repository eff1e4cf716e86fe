//! Label encoder mapping class indices back to label strings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered class labels, as stored in `{"classes": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Create an encoder from class labels in index order.
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// Load an encoder from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    /// Parse an encoder from JSON text.
    pub fn from_json(data: &str) -> Result<Self> {
        let encoder: LabelEncoder = serde_json::from_str(data)
            .map_err(|e| Error::ModelLoad(format!("invalid label encoder JSON: {e}")))?;
        if encoder.classes.is_empty() {
            return Err(Error::ModelLoad("label encoder has no classes".to_string()));
        }
        Ok(encoder)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the encoder has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Map encoded indices back to labels.
    pub fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<String>> {
        indices
            .iter()
            .map(|&i| {
                self.classes.get(i).cloned().ok_or_else(|| {
                    Error::Classify(format!(
                        "class index {} out of range for {} labels",
                        i,
                        self.classes.len()
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_transform() {
        let encoder = LabelEncoder::from_json(r#"{"classes": ["Body", "H1", "H2", "H3"]}"#).unwrap();
        assert_eq!(encoder.len(), 4);
        assert_eq!(
            encoder.inverse_transform(&[1, 0, 3]).unwrap(),
            vec!["H1", "Body", "H3"]
        );
    }

    #[test]
    fn test_out_of_range_index() {
        let encoder = LabelEncoder::new(["Body", "H1"]);
        assert!(matches!(
            encoder.inverse_transform(&[2]),
            Err(Error::Classify(_))
        ));
    }

    #[test]
    fn test_rejects_empty_or_invalid() {
        assert!(matches!(
            LabelEncoder::from_json(r#"{"classes": []}"#),
            Err(Error::ModelLoad(_))
        ));
        assert!(matches!(
            LabelEncoder::from_json("[1, 2]"),
            Err(Error::ModelLoad(_))
        ));
    }
}

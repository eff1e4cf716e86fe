//! Line classification.
//!
//! A [`LineClassifier`] assigns one label string per feature record. Labels
//! `"H1"`, `"H2"` and `"H3"` mark headings; anything else is body text.

mod encoder;
mod forest;

pub use encoder::LabelEncoder;
pub use forest::{ForestModel, Node, Tree};

use std::path::Path;

use crate::error::{Error, Result};
use crate::model::FeatureRecord;

/// Assigns a label to every feature record.
///
/// Implementations must return exactly one label per input record, in the
/// same order.
pub trait LineClassifier: Send + Sync {
    fn classify(&self, features: &[FeatureRecord]) -> Result<Vec<String>>;
}

/// Pre-trained decision forest together with its label encoder.
#[derive(Debug, Clone)]
pub struct ModelClassifier {
    model: ForestModel,
    encoder: LabelEncoder,
}

impl ModelClassifier {
    /// Pair a model with an encoder, checking that their class counts agree.
    pub fn new(model: ForestModel, encoder: LabelEncoder) -> Result<Self> {
        if encoder.len() != model.n_classes {
            return Err(Error::ModelLoad(format!(
                "label encoder has {} classes but model predicts {}",
                encoder.len(),
                model.n_classes
            )));
        }
        Ok(Self { model, encoder })
    }

    /// Load the model and encoder artifacts from disk.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, encoder_path: Q) -> Result<Self> {
        let model = ForestModel::load(model_path.as_ref())?;
        let encoder = LabelEncoder::load(encoder_path.as_ref())?;
        log::info!(
            "Loaded model: {} trees, classes {:?}",
            model.trees.len(),
            encoder.classes
        );
        Self::new(model, encoder)
    }

    pub fn labels(&self) -> &[String] {
        &self.encoder.classes
    }
}

impl LineClassifier for ModelClassifier {
    fn classify(&self, features: &[FeatureRecord]) -> Result<Vec<String>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        let encoded = self.model.predict(features)?;
        self.encoder.inverse_transform(&encoded)
    }
}

impl<C: LineClassifier + ?Sized> LineClassifier for &C {
    fn classify(&self, features: &[FeatureRecord]) -> Result<Vec<String>> {
        (**self).classify(features)
    }
}

impl<C: LineClassifier + ?Sized> LineClassifier for Box<C> {
    fn classify(&self, features: &[FeatureRecord]) -> Result<Vec<String>> {
        (**self).classify(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"{
        "format": "decision-forest",
        "version": 1,
        "features": ["font_size", "y_position", "x_position",
                     "text_length", "uppercase_ratio", "is_bold"],
        "n_classes": 3,
        "trees": [
            { "nodes": [
                { "feature": 0, "threshold": 13.0, "left": 1, "right": 2 },
                { "value": [5.0, 0.0, 0.0] },
                { "feature": 0, "threshold": 20.0, "left": 3, "right": 4 },
                { "value": [0.0, 0.0, 3.0] },
                { "value": [0.0, 3.0, 0.0] }
            ] }
        ]
    }"#;

    fn record(font_size: f64) -> FeatureRecord {
        FeatureRecord {
            font_size,
            y_position: 50.0,
            x_position: 72.0,
            text_length: 12,
            uppercase_ratio: 0.1,
            is_bold: false,
        }
    }

    fn classifier() -> ModelClassifier {
        ModelClassifier::new(
            ForestModel::from_json(MODEL).unwrap(),
            LabelEncoder::new(["Body", "H1", "H2"]),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_by_size() {
        let labels = classifier()
            .classify(&[record(10.0), record(16.0), record(24.0)])
            .unwrap();
        assert_eq!(labels, vec!["Body", "H2", "H1"]);
    }

    #[test]
    fn test_classify_empty() {
        assert!(classifier().classify(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_class_count_mismatch() {
        let result = ModelClassifier::new(
            ForestModel::from_json(MODEL).unwrap(),
            LabelEncoder::new(["Body", "H1"]),
        );
        assert!(matches!(result, Err(Error::ModelLoad(_))));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("headings_model.json");
        let encoder_path = dir.path().join("label_encoder.json");
        std::fs::write(&model_path, MODEL).unwrap();
        std::fs::write(&encoder_path, r#"{"classes": ["Body", "H1", "H2"]}"#).unwrap();

        let classifier = ModelClassifier::load(&model_path, &encoder_path).unwrap();
        assert_eq!(classifier.labels(), ["Body", "H1", "H2"]);

        let missing = ModelClassifier::load(dir.path().join("nope.json"), &encoder_path);
        assert!(matches!(missing, Err(Error::ModelLoad(_))));
    }
}

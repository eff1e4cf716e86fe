//! Decision forest model loaded from a JSON artifact.
//!
//! The artifact is produced outside this crate (for example by exporting a
//! trained scikit-learn tree ensemble):
//!
//! ```json
//! {
//!     "format": "decision-forest",
//!     "version": 1,
//!     "features": ["font_size", "y_position", "x_position",
//!                  "text_length", "uppercase_ratio", "is_bold"],
//!     "n_classes": 4,
//!     "trees": [
//!         { "nodes": [
//!             { "feature": 0, "threshold": 13.0, "left": 1, "right": 2 },
//!             { "value": [9.0, 0.0, 1.0, 0.0] },
//!             { "value": [0.0, 7.0, 0.0, 0.0] }
//!         ] }
//!     ]
//! }
//! ```
//!
//! Traversal starts at node 0 and goes left when `x[feature] <= threshold`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{FeatureRecord, FEATURE_COLUMNS};

const FORMAT_NAME: &str = "decision-forest";
const SUPPORTED_VERSION: u32 = 1;

/// A tree node: either an axis-aligned split or a leaf of class weights.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

/// A single decision tree; node 0 is the root.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Class probabilities for one row.
    fn predict_proba(&self, row: &[f64; 6]) -> Result<Vec<f64>> {
        let mut index = 0;
        // A valid tree reaches a leaf in at most `nodes.len()` steps.
        for _ in 0..=self.nodes.len() {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { value } => {
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Ok(vec![0.0; value.len()]);
                    }
                    return Ok(value.iter().map(|v| v / total).collect());
                }
            }
        }
        Err(Error::Classify("decision tree contains a cycle".to_string()))
    }

    fn validate(&self, tree_index: usize, n_classes: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::ModelLoad(format!("tree {tree_index} has no nodes")));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= FEATURE_COLUMNS.len() {
                        return Err(Error::ModelLoad(format!(
                            "tree {tree_index} node {i}: feature index {feature} out of range"
                        )));
                    }
                    if *left >= self.nodes.len() || *right >= self.nodes.len() {
                        return Err(Error::ModelLoad(format!(
                            "tree {tree_index} node {i}: child index out of range"
                        )));
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(Error::ModelLoad(format!(
                            "tree {tree_index} node {i}: leaf has {} classes, expected {n_classes}",
                            value.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// A forest of decision trees whose averaged probabilities pick the class.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestModel {
    pub format: String,
    pub version: u32,
    pub features: Vec<String>,
    pub n_classes: usize,
    pub trees: Vec<Tree>,
}

impl ForestModel {
    /// Load and validate a model from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    /// Parse and validate a model from JSON text.
    pub fn from_json(data: &str) -> Result<Self> {
        let model: ForestModel = serde_json::from_str(data)
            .map_err(|e| Error::ModelLoad(format!("invalid model JSON: {e}")))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.format != FORMAT_NAME {
            return Err(Error::ModelLoad(format!(
                "unsupported model format '{}'",
                self.format
            )));
        }
        if self.version != SUPPORTED_VERSION {
            return Err(Error::ModelLoad(format!(
                "unsupported model version {}",
                self.version
            )));
        }
        if self.features.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
            return Err(Error::ModelLoad(format!(
                "model features {:?} do not match {:?}",
                self.features, FEATURE_COLUMNS
            )));
        }
        if self.n_classes == 0 {
            return Err(Error::ModelLoad("model has no classes".to_string()));
        }
        if self.trees.is_empty() {
            return Err(Error::ModelLoad("model has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_classes)?;
        }
        Ok(())
    }

    /// Encoded class index for every row.
    pub fn predict(&self, rows: &[FeatureRecord]) -> Result<Vec<usize>> {
        rows.iter().map(|r| self.predict_one(&r.to_row())).collect()
    }

    fn predict_one(&self, row: &[f64; 6]) -> Result<usize> {
        let mut totals = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in totals.iter_mut().zip(tree.predict_proba(row)?) {
                *acc += p;
            }
        }

        // First maximum wins.
        let mut best = 0;
        for (i, p) in totals.iter().enumerate() {
            if *p > totals[best] {
                best = i;
            }
        }
        Ok(best)
    }
}

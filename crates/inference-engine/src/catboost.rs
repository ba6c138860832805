//! CatBoost JSON Model Evaluation
//!
//! Reads the layout written by CatBoost's `save_model(..., format="json")`
//! for a binary classifier over float features:
//!
//! ```json
//! {
//!   "features_info": { "float_features": [
//!       { "flat_feature_index": 0, "feature_index": 0, "feature_id": "Age" } ] },
//!   "oblivious_trees": [
//!       { "splits": [ { "float_feature_index": 0, "border": 29.5 } ],
//!         "leaf_values": [ -0.1, 0.2 ] } ],
//!   "scale_and_bias": [ 1.0, [ 0.0 ] ]
//! }
//! ```
//!
//! Each tree is oblivious: split `d` compares one feature against a border
//! and contributes bit `d` of the leaf index.

use crate::engine::Classifier;
use crate::InferenceError;
use feature_engine::{Column, FeatureVector, FEATURE_DIMENSION};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Deepest tree accepted; CatBoost itself caps depth at 16
const MAX_DEPTH: usize = 16;

/// Largest accepted float feature index plus one
const MAX_INPUTS: usize = 4096;

#[derive(Debug, Deserialize)]
struct ModelJson {
    features_info: FeaturesInfo,
    oblivious_trees: Vec<TreeJson>,
    #[serde(default)]
    scale_and_bias: Option<(f64, Vec<f64>)>,
}

#[derive(Debug, Deserialize)]
struct FeaturesInfo {
    #[serde(default)]
    float_features: Vec<FloatFeatureJson>,
    #[serde(default)]
    categorical_features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FloatFeatureJson {
    flat_feature_index: usize,
    #[serde(default)]
    feature_index: Option<usize>,
    #[serde(default)]
    feature_id: Option<String>,
}

impl FloatFeatureJson {
    /// Input slot referenced by split `float_feature_index`
    fn slot(&self) -> usize {
        self.feature_index.unwrap_or(self.flat_feature_index)
    }
}

#[derive(Debug, Deserialize)]
struct TreeJson {
    splits: Vec<SplitJson>,
    leaf_values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct SplitJson {
    float_feature_index: usize,
    border: f64,
    #[serde(default)]
    split_type: Option<String>,
}

/// One oblivious tree: a split per level and `2^depth` leaves
#[derive(Debug, Clone)]
struct ObliviousTree {
    /// `(model input slot, border)` per level
    splits: Vec<(usize, f64)>,
    leaf_values: Vec<f64>,
}

impl ObliviousTree {
    fn evaluate(&self, inputs: &[f64]) -> f64 {
        let leaf = self
            .splits
            .iter()
            .enumerate()
            .fold(0usize, |index, (depth, (slot, border))| {
                if inputs[*slot] > *border {
                    index | (1 << depth)
                } else {
                    index
                }
            });
        self.leaf_values[leaf]
    }
}

/// Gradient-boosted oblivious-tree ensemble for binary classification
#[derive(Debug, Clone)]
pub struct ObliviousEnsemble {
    /// Schema column feeding each model input slot; `None` reads as 0
    inputs: Vec<Option<Column>>,
    trees: Vec<ObliviousTree>,
    scale: f64,
    bias: f64,
}

impl ObliviousEnsemble {
    /// Load a CatBoost JSON export from disk
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InferenceError::ModelNotFound(path.to_path_buf())
            } else {
                InferenceError::ModelLoadError(format!("{}: {e}", path.display()))
            }
        })?;
        let model = Self::from_json_str(&json)?;
        info!(
            "Loaded CatBoost model from {} ({} trees, {} inputs)",
            path.display(),
            model.trees.len(),
            model.inputs.len()
        );
        Ok(model)
    }

    /// Parse and validate a CatBoost JSON export
    pub fn from_json_str(json: &str) -> Result<Self, InferenceError> {
        let raw: ModelJson = serde_json::from_str(json)
            .map_err(|e| InferenceError::InvalidModel(format!("malformed model JSON: {e}")))?;

        if !raw.features_info.categorical_features.is_empty() {
            return Err(InferenceError::InvalidModel(format!(
                "model declares {} categorical features; only float features are supported",
                raw.features_info.categorical_features.len()
            )));
        }

        // Splits address inputs by feature_index, which may skip numbers
        let float_features = raw.features_info.float_features;
        let slots = float_features
            .iter()
            .map(FloatFeatureJson::slot)
            .max()
            .map_or(0, |last| last + 1);
        if slots > MAX_INPUTS {
            return Err(InferenceError::InvalidModel(format!(
                "feature index {} is above the {MAX_INPUTS}-input limit",
                slots - 1
            )));
        }

        let mut inputs: Vec<Option<Column>> = vec![None; slots];
        for feature in &float_features {
            inputs[feature.slot()] = resolve_input(feature)?;
        }

        let trees = raw
            .oblivious_trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| build_tree(i, tree, inputs.len()))
            .collect::<Result<Vec<_>, _>>()?;

        let (scale, bias) = match raw.scale_and_bias {
            Some((scale, biases)) => (scale, biases.first().copied().unwrap_or(0.0)),
            None => (1.0, 0.0),
        };
        if !scale.is_finite() || !bias.is_finite() {
            return Err(InferenceError::InvalidModel(
                "scale_and_bias must be finite".to_string(),
            ));
        }

        Ok(Self {
            inputs,
            trees,
            scale,
            bias,
        })
    }

    /// Number of trees in the ensemble
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Raw additive score (log-odds of the high-risk class)
    pub fn raw_score(&self, features: &FeatureVector) -> f64 {
        let inputs: Vec<f64> = self
            .inputs
            .iter()
            .map(|column| column.map(|c| features.get(c)).unwrap_or(0.0))
            .collect();
        let sum: f64 = self.trees.iter().map(|tree| tree.evaluate(&inputs)).sum();
        self.scale * sum + self.bias
    }
}

/// Map a model input to the schema column it reads
fn resolve_input(feature: &FloatFeatureJson) -> Result<Option<Column>, InferenceError> {
    match feature.feature_id.as_deref() {
        Some(name) => {
            let column = Column::from_name(name);
            if column.is_none() {
                warn!("Model feature '{}' is not produced; it will read as 0", name);
            }
            Ok(column)
        }
        None if feature.flat_feature_index < FEATURE_DIMENSION => {
            Ok(Some(Column::ALL[feature.flat_feature_index]))
        }
        None => Err(InferenceError::InvalidModel(format!(
            "feature index {} is outside the {}-column vector",
            feature.flat_feature_index, FEATURE_DIMENSION
        ))),
    }
}

fn build_tree(index: usize, tree: TreeJson, num_inputs: usize) -> Result<ObliviousTree, InferenceError> {
    let depth = tree.splits.len();
    if depth > MAX_DEPTH {
        return Err(InferenceError::InvalidModel(format!(
            "tree {index} has depth {depth}, above {MAX_DEPTH}"
        )));
    }
    if tree.leaf_values.len() != 1 << depth {
        return Err(InferenceError::InvalidModel(format!(
            "tree {index} has {} leaf values, expected {}",
            tree.leaf_values.len(),
            1 << depth
        )));
    }

    let splits = tree
        .splits
        .iter()
        .map(|split| {
            if let Some(kind) = split.split_type.as_deref() {
                if kind != "FloatFeature" {
                    return Err(InferenceError::InvalidModel(format!(
                        "tree {index} uses unsupported split type {kind}"
                    )));
                }
            }
            if split.float_feature_index >= num_inputs {
                return Err(InferenceError::InvalidModel(format!(
                    "tree {index} splits on feature {} but the model has {num_inputs}",
                    split.float_feature_index
                )));
            }
            Ok((split.float_feature_index, split.border))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Tree {}: depth {}", index, depth);
    Ok(ObliviousTree {
        splits,
        leaf_values: tree.leaf_values,
    })
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for ObliviousEnsemble {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let score = self.raw_score(features);
        if score.is_nan() {
            return Err(InferenceError::InferenceFailed(
                "model produced a NaN score".to_string(),
            ));
        }
        Ok(sigmoid(score))
    }

    fn describe(&self) -> String {
        format!("catboost-json ({} trees)", self.trees.len())
    }
}

//! ONNX Model Evaluation via tract

use crate::engine::Classifier;
use crate::InferenceError;
use feature_engine::{FeatureVector, FEATURE_DIMENSION};
use std::fmt;
use std::path::{Path, PathBuf};
use tract_onnx::prelude::*;
use tracing::info;

/// ONNX classifier taking a `[1, N]` f32 input.
///
/// CatBoost's ONNX export emits a label output and an f32 probability
/// output of shape `[1, 2]`; column 1 is the high-risk class.
pub struct OnnxModel {
    plan: TypedRunnableModel<TypedModel>,
    path: PathBuf,
}

impl OnnxModel {
    /// Load and optimize an ONNX model
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {e:#}", path.display())))?;

        info!("Loaded ONNX model from {}", path.display());
        Ok(Self {
            plan,
            path: path.to_path_buf(),
        })
    }
}

impl fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxModel").field("path", &self.path).finish()
    }
}

impl Classifier for OnnxModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, FEATURE_DIMENSION), features.to_f32())
            .map_err(|e| InferenceError::InvalidInputShape {
                expected: format!("[1, {FEATURE_DIMENSION}]"),
                actual: e.to_string(),
            })?
            .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(format!("{e:#}")))?;

        let probabilities: Vec<f32> = outputs
            .iter()
            .find(|output| output.datum_type() == f32::datum_type())
            .ok_or_else(|| {
                InferenceError::InferenceFailed("model has no f32 probability output".to_string())
            })?
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(format!("{e:#}")))?
            .iter()
            .copied()
            .collect();

        positive_probability(&probabilities)
    }

    fn describe(&self) -> String {
        format!("onnx ({})", self.path.display())
    }
}

/// High-risk probability from one row of classifier output.
///
/// Column 1 is the high-risk class; a single column is already the
/// positive-class probability.
fn positive_probability(probabilities: &[f32]) -> Result<f64, InferenceError> {
    match probabilities {
        [_, high, ..] => Ok(*high as f64),
        [only] => Ok(*only as f64),
        [] => Err(InferenceError::InferenceFailed(
            "empty probability output".to_string(),
        )),
    }
}

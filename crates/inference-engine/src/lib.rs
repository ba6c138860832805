//! Return-Risk Inference Engine
//!
//! Loads the pre-trained return-risk classifier and scores feature vectors.
//! Two artifact formats are supported: CatBoost's JSON export (evaluated
//! natively) and ONNX (evaluated with tract, behind the `onnx` feature).

mod catboost;
mod engine;
#[cfg(feature = "onnx")]
mod onnx;

pub use catboost::ObliviousEnsemble;
pub use engine::{load_model, Classifier, InferenceEngine, InferenceResult, Model, Prediction, RiskLabel};
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use std::path::PathBuf;
use thiserror::Error;

/// Errors during model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model file '{}' not found", .0.display())]
    ModelNotFound(PathBuf),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
}

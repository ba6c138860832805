//! Inference Engine Implementation

use crate::catboost::ObliviousEnsemble;
#[cfg(feature = "onnx")]
use crate::onnx::OnnxModel;
use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Return-risk class predicted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    /// Class 0
    LowRisk,
    /// Class 1
    HighRisk,
}

impl RiskLabel {
    /// Label for a high-risk probability under a decision threshold
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability > threshold {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        }
    }

    /// Class index used at training time
    pub fn class_index(&self) -> u8 {
        match self {
            RiskLabel::LowRisk => 0,
            RiskLabel::HighRisk => 1,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "low_risk",
            RiskLabel::HighRisk => "high_risk",
        }
    }
}

/// Prediction result from inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class
    pub label: RiskLabel,
    /// Probability of [`RiskLabel::HighRisk`] (0.0 to 1.0)
    pub probability: f64,
}

/// Result of inference operation
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: Prediction,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// A trained binary classifier over the feature schema.
///
/// Implementations must be deterministic: the same vector always yields the
/// same probability.
pub trait Classifier {
    /// Probability of the high-risk class
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

/// A loaded model artifact
#[derive(Debug)]
pub enum Model {
    /// CatBoost JSON export
    CatBoost(ObliviousEnsemble),
    /// ONNX export run through tract
    #[cfg(feature = "onnx")]
    Onnx(OnnxModel),
}

impl Classifier for Model {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        match self {
            Model::CatBoost(model) => model.predict_proba(features),
            #[cfg(feature = "onnx")]
            Model::Onnx(model) => model.predict_proba(features),
        }
    }

    fn describe(&self) -> String {
        match self {
            Model::CatBoost(model) => model.describe(),
            #[cfg(feature = "onnx")]
            Model::Onnx(model) => model.describe(),
        }
    }
}

/// Load a model artifact, choosing the format by file extension.
///
/// Fails with [`InferenceError::ModelNotFound`] when the file is absent.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model, InferenceError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(InferenceError::ModelNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(Model::CatBoost(ObliviousEnsemble::load_json(path)?)),
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Model::Onnx(OnnxModel::load(path)?)),
        #[cfg(not(feature = "onnx"))]
        Some("onnx") => Err(InferenceError::InvalidModel(
            "ONNX models need the `onnx` feature".to_string(),
        )),
        _ => Err(InferenceError::InvalidModel(format!(
            "unsupported model format: {} (expected .json or .onnx)",
            path.display()
        ))),
    }
}

/// Return-risk inference engine.
///
/// Holds the classifier read-only for the life of the process.
pub struct InferenceEngine {
    /// Where the model came from
    model_path: PathBuf,
    /// The classifier
    classifier: Box<dyn Classifier>,
    /// Probabilities above this are labelled high risk
    threshold: f64,
}

impl InferenceEngine {
    /// Load the model at `model_path` and create an engine around it
    pub fn load<P: AsRef<Path>>(model_path: P, threshold: f64) -> Result<Self, InferenceError> {
        let model_path = model_path.as_ref();
        info!("Loading return-risk model: {}", model_path.display());
        let model = load_model(model_path)?;
        info!("Model ready: {}", model.describe());
        Ok(Self::with_classifier(model_path, Box::new(model), threshold))
    }

    /// Create an engine around an already-built classifier
    pub fn with_classifier<P: Into<PathBuf>>(
        model_path: P,
        classifier: Box<dyn Classifier>,
        threshold: f64,
    ) -> Self {
        Self {
            model_path: model_path.into(),
            classifier,
            threshold,
        }
    }

    /// Run inference on a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();

        let probability = self.classifier.predict_proba(features)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InferenceFailed(format!(
                "probability {probability} outside [0, 1]"
            )));
        }
        let label = RiskLabel::from_probability(probability, self.threshold);

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            "Prediction: {} (p={:.4}, latency={}us)",
            label.as_str(),
            probability,
            latency_us
        );

        Ok(InferenceResult {
            prediction: Prediction { label, probability },
            latency_us,
        })
    }

    /// Decision threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Get model path
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

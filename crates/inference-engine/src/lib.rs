//! Calorie Estimator Backends
//!
//! Provides the [`Estimator`] contract used by the prediction service and
//! two backends: a regression tree ensemble exported to JSON and an ONNX
//! model executed with tract-onnx.

mod forest;
mod onnx;

pub use forest::{ForestEstimator, RegressionTree};
pub use onnx::OnnxEstimator;

use feature_assembler::FeatureVector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised by an estimator
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("Estimator returned a non-finite prediction: {0}")]
    InvalidOutput(f64),
}

/// A trained regression model mapping a feature vector to calories burned
///
/// Implementations are loaded once and shared read-only, so `predict` takes
/// `&self` and must not mutate the model.
pub trait Estimator: Send + Sync {
    /// Predict calories burned for one feature vector
    fn predict(&self, features: FeatureVector) -> Result<f64, EstimatorError>;
}

/// On-disk model format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Tree ensemble exported as JSON
    Forest,
    /// ONNX graph
    Onnx,
}

impl ModelFormat {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::Forest => "forest",
            ModelFormat::Onnx => "onnx",
        }
    }
}

/// Load an estimator of the given format from disk
pub fn load_estimator(
    format: ModelFormat,
    path: &Path,
) -> Result<Box<dyn Estimator>, EstimatorError> {
    info!("Loading {} estimator from {}", format.as_str(), path.display());

    let estimator: Box<dyn Estimator> = match format {
        ModelFormat::Forest => Box::new(ForestEstimator::load(path)?),
        ModelFormat::Onnx => Box::new(OnnxEstimator::load(path)?),
    };
    Ok(estimator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model() {
        let path = Path::new("does/not/exist.json");
        let err = load_estimator(ModelFormat::Forest, path).err().unwrap();
        assert!(matches!(err, EstimatorError::ModelLoadError(_)));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_model_format_names() {
        assert_eq!(ModelFormat::Forest.as_str(), "forest");
        assert_eq!(ModelFormat::Onnx.as_str(), "onnx");
    }
}

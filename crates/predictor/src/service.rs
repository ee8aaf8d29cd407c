//! Prediction Service
//!
//! The single call site that turns a raw input set into a message for the
//! operator: assemble the feature vector, call the estimator once, and
//! classify whatever went wrong.

use feature_assembler::{AssemblyError, FeatureAssembler, RawInputSet};
use inference_engine::{Estimator, EstimatorError};
use metrics::counter;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Failure of one prediction attempt
#[derive(Debug, Error)]
pub enum PredictionError {
    /// The input set could not be read at all
    #[error("Invalid JSON input: {0}")]
    MalformedInput(String),
    /// The operator's input was rejected
    #[error(transparent)]
    Input(#[from] AssemblyError),
    /// The estimator itself failed
    #[error(transparent)]
    Estimator(#[from] EstimatorError),
}

impl PredictionError {
    /// Whether the operator can fix this by correcting the form
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PredictionError::Input(_) | PredictionError::MalformedInput(_)
        )
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::MalformedInput(_) => "malformed_input",
            PredictionError::Input(e) => e.kind(),
            PredictionError::Estimator(_) => "estimator",
        }
    }
}

/// Message shown to the operator after a prediction attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMessage {
    /// "Prediction", "Input Error" or "Unexpected Error"
    pub title: &'static str,
    pub body: String,
    pub is_error: bool,
}

impl DisplayMessage {
    /// Successful prediction, formatted to two decimals
    pub fn prediction(calories: f64) -> Self {
        Self {
            title: "Prediction",
            body: format!("Calories Burned: {:.2}", calories),
            is_error: false,
        }
    }

    /// Error message keeping input mistakes apart from system faults
    pub fn from_error(err: &PredictionError) -> Self {
        if err.is_input_error() {
            Self {
                title: "Input Error",
                body: err.to_string(),
                is_error: true,
            }
        } else {
            Self {
                title: "Unexpected Error",
                body: format!("An unexpected error occurred: {}", err),
                is_error: true,
            }
        }
    }
}

impl fmt::Display for DisplayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}

/// Pairs feature assembly with a shared, read-only estimator
pub struct PredictionService {
    assembler: FeatureAssembler,
    estimator: Arc<dyn Estimator>,
}

impl PredictionService {
    /// Create a service around a loaded estimator
    pub fn new(estimator: Arc<dyn Estimator>) -> Self {
        Self {
            assembler: FeatureAssembler::new(),
            estimator,
        }
    }

    /// Validate the input and run exactly one estimator call
    pub fn predict(&self, raw: &RawInputSet) -> Result<f64, PredictionError> {
        let features = self.assembler.assemble(raw)?;

        let prediction = self.estimator.predict(features)?;
        if !prediction.is_finite() {
            return Err(EstimatorError::InvalidOutput(prediction).into());
        }

        debug!("Predicted {:.2} calories", prediction);
        Ok(prediction)
    }

    /// Run a prediction and translate the outcome into a display message
    pub fn handle(&self, raw: &RawInputSet) -> DisplayMessage {
        self.report(self.predict(raw))
    }

    /// Like [`handle`](Self::handle), for an input set serialized as JSON
    ///
    /// Unreadable JSON, or values that are not strings, are input errors.
    pub fn handle_json(&self, json: &str) -> DisplayMessage {
        let result = serde_json::from_str::<RawInputSet>(json)
            .map_err(|e| PredictionError::MalformedInput(e.to_string()))
            .and_then(|raw| self.predict(&raw));
        self.report(result)
    }

    fn report(&self, result: Result<f64, PredictionError>) -> DisplayMessage {
        counter!("predictions_total").increment(1);

        match result {
            Ok(calories) => {
                info!("Prediction completed");
                DisplayMessage::prediction(calories)
            }
            Err(err) => {
                counter!("prediction_errors_total", "kind" => err.kind()).increment(1);
                if err.is_input_error() {
                    warn!("Prediction rejected ({}): {}", err.kind(), err);
                } else {
                    error!("Estimator failure: {}", err);
                }
                DisplayMessage::from_error(&err)
            }
        }
    }
}

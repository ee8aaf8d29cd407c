//! Calorie Predictor
//!
//! Operator-facing side of the calorie prediction pipeline: configuration,
//! logging, the prediction service that pairs feature assembly with a
//! single estimator call, and the interactive form.

pub mod form;
pub mod service;
pub mod settings;

pub use form::{ConditionalField, FieldMode, Form};
pub use service::{DisplayMessage, PredictionError, PredictionService};
pub use settings::{AppConfig, CliOptions, ConfigError, LoggingConfig, ModelConfig};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
///
/// Logs are written to stderr so they never interleave with the form.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| ConfigError::InvalidLogLevel(config.level.clone()))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| ConfigError::Logging(e.to_string()))
}

//! Configuration and command-line options

use config::{Config, Environment, File};
use inference_engine::ModelFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "calorie-predictor";

/// Hand-written demo forest shipped with the repository, not a trained model
pub const SAMPLE_MODEL_PATH: &str = "models/sample_forest.json";

/// Prefix for environment overrides, e.g. `CALORIE__MODEL__PATH`
pub const ENV_PREFIX: &str = "CALORIE";

/// Command-line usage
pub const USAGE: &str = "\
Usage: calorie-predictor [--config <path>] [--json]

Options:
  --config <path>  Read settings from <path> instead of ./calorie-predictor.toml
  --json           Read one input set as JSON from stdin and print the result
  -h, --help       Show this message";

/// Configuration and startup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Unknown argument: {0}")]
    UnknownArgument(String),
    #[error("Missing value for {0}")]
    MissingValue(&'static str),
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Estimator model location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the model file
    pub path: PathBuf,
    /// Model file format
    pub format: ModelFormat,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, a TOML file, and the environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .set_default("model.path", SAMPLE_MODEL_PATH)?
            .set_default("model.format", "forest")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Whether the configured model is the demo forest
    pub fn uses_sample_model(&self) -> bool {
        self.model.path.ends_with(SAMPLE_MODEL_PATH)
    }
}

/// Parsed command-line options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Explicit configuration file
    pub config_path: Option<String>,
    /// One-shot JSON mode
    pub json: bool,
    /// Print usage and exit
    pub help: bool,
}

impl CliOptions {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or(ConfigError::MissingValue("--config"))?;
                    options.config_path = Some(path);
                }
                "--json" => options.json = true,
                "-h" | "--help" => options.help = true,
                _ => return Err(ConfigError::UnknownArgument(arg)),
            }
        }

        Ok(options)
    }
}

//! Calorie Predictor - Main Entry Point

use anyhow::{Context, Result};
use inference_engine::load_estimator;
use predictor::settings::USAGE;
use predictor::{init_logging, AppConfig, CliOptions, Form, PredictionService};
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> Result<()> {
    let options = CliOptions::parse(std::env::args().skip(1))?;
    if options.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = AppConfig::load(options.config_path.as_deref())?;
    init_logging(&config.logging)?;

    info!("=== Calorie Predictor v{} ===", env!("CARGO_PKG_VERSION"));

    if config.uses_sample_model() {
        warn!("Using the demo forest; predictions are illustrative, not from a trained model");
    }

    // Loaded once and shared read-only by every prediction
    let estimator = load_estimator(config.model.format, &config.model.path)
        .with_context(|| format!("loading model {}", config.model.path.display()))?;
    let service = PredictionService::new(Arc::from(estimator));

    if options.json {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("reading JSON input from stdin")?;
        let message = service.handle_json(&input);
        println!("{}", serde_json::to_string(&message)?);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut form = Form::new(stdin.lock(), io::stdout());
    let rounds = form.run(&service)?;

    info!("Session ended after {} predictions", rounds);
    Ok(())
}

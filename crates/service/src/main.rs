//! Prediction service - skill classifier over HTTP
//!
//! Loads the classifier artifact, then serves predictions until
//! interrupted. A missing or invalid artifact stops the process before
//! the port is bound.

use anyhow::Result;
use classifier_lib::ArtifactError;
use prediction_service::{config::ServiceConfig, startup};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load()?;

    startup::init_tracing(config.log_json);
    info!(
        artifact = %config.artifact_path.display(),
        addr = %config.bind_addr(),
        "Starting prediction-service"
    );

    match startup::run(config, startup::shutdown_signal()).await {
        Ok(()) => Ok(()),
        // Already reported on stdout by the startup logger
        Err(e) if e.downcast_ref::<ArtifactError>().is_some() => std::process::exit(1),
        Err(e) => Err(e),
    }
}

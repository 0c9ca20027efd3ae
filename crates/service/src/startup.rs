//! Process lifecycle: load the classifier, then bind and serve

use crate::api::{self, AppState};
use crate::config::ServiceConfig;
use anyhow::{Context, Result};
use classifier_lib::{
    health::components, load_artifact, ArtifactError, HealthRegistry, ServiceMetrics,
    StructuredLogger,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const SERVICE_NAME: &str = "prediction-service";

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing to stdout with an env filter (default `info`)
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Load the classifier artifact and assemble the shared request state
pub async fn build_state(
    config: &ServiceConfig,
    logger: &StructuredLogger,
) -> Result<Arc<AppState>, ArtifactError> {
    let artifact_path = config.artifact_path.display().to_string();

    let artifact = load_artifact(&config.artifact_path, config.artifact_sha256.as_deref())
        .inspect_err(|e| logger.log_model_load_failed(&artifact_path, &e.to_string()))?;

    logger.log_model_loaded(
        &artifact_path,
        &artifact.checksum,
        artifact.size_bytes,
        artifact.labels.len(),
    );

    let metrics = ServiceMetrics::new();
    metrics.set_model_info(&artifact.checksum, artifact.labels.len());

    let health_registry = HealthRegistry::new();
    health_registry.register(components::CLASSIFIER).await;

    Ok(Arc::new(AppState::new(
        artifact.classifier,
        health_registry,
        metrics,
        logger.clone(),
    )))
}

/// Run the service until `shutdown` resolves
///
/// The artifact is loaded before the listener is bound, so a missing or
/// invalid artifact means the port is never opened.
pub async fn run(
    config: ServiceConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let logger = StructuredLogger::new(SERVICE_NAME);

    let state = build_state(&config, &logger).await?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    state.health_registry.set_ready(true).await;
    logger.log_startup(SERVICE_VERSION, &listener.local_addr()?.to_string());

    api::serve(listener, state, shutdown).await?;

    logger.log_shutdown("shutdown signal received");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

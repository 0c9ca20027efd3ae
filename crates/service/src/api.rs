//! HTTP API: prediction endpoint, health checks and Prometheus metrics

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use classifier_lib::{
    health::components, Classifier, ClassifierError, HealthRegistry, PredictResponse,
    RequestErrorKind, ServiceMetrics, StructuredLogger, QUESTION_REQUIRED,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::info;

/// Shared application state
///
/// The classifier is loaded before this is built and never replaced.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            classifier,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Reasons a request body yields no question
#[derive(Debug, PartialEq, Eq)]
enum BodyError {
    MissingQuestion,
    Malformed(String),
}

impl BodyError {
    fn into_reply(self) -> (StatusCode, RequestErrorKind, String) {
        match self {
            BodyError::MissingQuestion => (
                StatusCode::BAD_REQUEST,
                RequestErrorKind::InvalidRequest,
                QUESTION_REQUIRED.to_string(),
            ),
            BodyError::Malformed(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RequestErrorKind::Internal,
                message,
            ),
        }
    }
}

/// JSON values that count as no question: null, false, zero and empty containers
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Pull the question text out of a raw JSON body
///
/// Absent or blank questions are client errors; anything else that is not
/// a JSON object with a string question is a malformed request.
fn extract_question(body: &[u8]) -> Result<String, BodyError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| BodyError::Malformed(format!("Failed to decode JSON object: {}", e)))?;

    let Value::Object(mut fields) = value else {
        return Err(BodyError::Malformed(
            "Request body must be a JSON object".to_string(),
        ));
    };

    match fields.remove("question") {
        None => Err(BodyError::MissingQuestion),
        Some(value) if is_blank(&value) => Err(BodyError::MissingQuestion),
        Some(Value::String(question)) => Ok(question),
        Some(other) => Err(BodyError::Malformed(format!(
            "'question' must be a string, got {}",
            other
        ))),
    }
}

/// Run the classifier on a single question and take its only label
async fn classify(classifier: Arc<dyn Classifier>, question: String) -> Result<String, String> {
    let result = tokio::task::spawn_blocking(move || {
        let labels = classifier.predict(std::slice::from_ref(&question))?;
        labels
            .into_iter()
            .next()
            .ok_or(ClassifierError::OutputMismatch {
                expected: 1,
                got: 0,
            })
    })
    .await;

    match result {
        Ok(Ok(label)) => Ok(label),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("prediction task failed: {}", e)),
    }
}

/// Predict the skill tested by a question
async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let question = match extract_question(&body) {
        Ok(question) => question,
        Err(e) => {
            let (status, kind, message) = e.into_reply();
            state.metrics.inc_request_errors(kind);
            state.logger.log_prediction_failed(kind, &message);
            return (status, Json(PredictResponse::error(message)));
        }
    };

    let question_chars = question.chars().count();
    let start = Instant::now();
    let result = classify(state.classifier.clone(), question).await;
    let elapsed = start.elapsed();
    state.metrics.observe_prediction_latency(elapsed.as_secs_f64());

    match result {
        Ok(label) => {
            state.health_registry.recover(components::CLASSIFIER).await;
            state.metrics.inc_predictions();
            state
                .logger
                .log_prediction(question_chars, &label, elapsed.as_micros());
            (StatusCode::OK, Json(PredictResponse::prediction(label)))
        }
        Err(message) => {
            state
                .health_registry
                .set_degraded(components::CLASSIFIER, message.as_str())
                .await;
            state.metrics.inc_request_errors(RequestErrorKind::Internal);
            state
                .logger
                .log_prediction_failed(RequestErrorKind::Internal, &message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PredictResponse::error(message)),
            )
        }
    }
}

/// Health check response - always 200 while the process is up
///
/// A failed prediction marks the classifier degraded until the next
/// successful one; the body carries that detail.
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    (StatusCode::OK, Json(health))
}

/// Readiness check response - returns 200 once the classifier is loaded
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            e.to_string().into_bytes(),
        ),
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Serve the API on an already-bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %listener.local_addr()?, "Starting API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

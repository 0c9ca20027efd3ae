//! Observability for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, request outcomes, loaded model info)
//! - Structured event logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for prediction latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Why a request did not produce a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// Missing or empty question (400)
    InvalidRequest,
    /// Malformed body or classifier failure (500)
    Internal,
}

impl RequestErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestErrorKind::InvalidRequest => "invalid_request",
            RequestErrorKind::Internal => "internal",
        }
    }
}

struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    request_errors_total: IntCounterVec,
    model_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "prediction_service_prediction_latency_seconds",
                "Time spent running the classifier for one request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "prediction_service_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            request_errors_total: register_int_counter_vec!(
                "prediction_service_request_errors_total",
                "Total number of prediction requests answered with an error",
                &["kind"]
            )
            .expect("Failed to register request_errors_total"),

            model_info: register_gauge_vec!(
                "prediction_service_model_info",
                "Information about the loaded classifier artifact",
                &["checksum", "labels"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Handle to the service's Prometheus metrics
///
/// Clones share the same process-wide metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_request_errors(&self, kind: RequestErrorKind) {
        self.inner()
            .request_errors_total
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    /// Publish the loaded artifact's checksum and label count
    pub fn set_model_info(&self, checksum: &str, label_count: usize) {
        let info = &self.inner().model_info;
        let labels = label_count.to_string();
        info.reset();
        info.with_label_values(&[checksum, labels.as_str()]).set(1.0);
    }

    pub fn predictions_total(&self) -> u64 {
        self.inner().predictions_total.get()
    }

    pub fn request_errors_total(&self, kind: RequestErrorKind) -> u64 {
        self.inner()
            .request_errors_total
            .with_label_values(&[kind.as_str()])
            .get()
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "service_started",
            service = %self.service_name,
            version = %version,
            addr = %addr,
            "Prediction service listening"
        );
    }

    pub fn log_model_loaded(&self, path: &str, checksum: &str, size_bytes: usize, labels: usize) {
        info!(
            event = "model_loaded",
            service = %self.service_name,
            path = %path,
            checksum = %checksum,
            size_bytes = size_bytes,
            labels = labels,
            "Model loaded successfully"
        );
    }

    pub fn log_model_load_failed(&self, path: &str, reason: &str) {
        error!(
            event = "model_load_failed",
            service = %self.service_name,
            path = %path,
            reason = %reason,
            "Error: {}",
            reason
        );
    }

    pub fn log_prediction(&self, question_chars: usize, label: &str, latency_us: u128) {
        info!(
            event = "prediction_served",
            service = %self.service_name,
            question_chars = question_chars,
            skill_tested = %label,
            latency_us = latency_us,
            "Prediction served"
        );
    }

    pub fn log_prediction_failed(&self, kind: RequestErrorKind, reason: &str) {
        warn!(
            event = "prediction_failed",
            service = %self.service_name,
            kind = kind.as_str(),
            reason = %reason,
            "Prediction request failed"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Prediction service shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_metrics_counters() {
        let metrics = ServiceMetrics::new();

        let before = metrics.request_errors_total(RequestErrorKind::InvalidRequest);
        metrics.inc_request_errors(RequestErrorKind::InvalidRequest);
        assert!(metrics.request_errors_total(RequestErrorKind::InvalidRequest) > before);

        let before = metrics.predictions_total();
        metrics.inc_predictions();
        assert!(metrics.predictions_total() > before);

        metrics.observe_prediction_latency(0.002);
        metrics.set_model_info("abc123", 4);
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(RequestErrorKind::InvalidRequest.as_str(), "invalid_request");
        assert_eq!(RequestErrorKind::Internal.as_str(), "internal");
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("prediction-service");
        assert_eq!(logger.service_name, "prediction-service");
    }
}

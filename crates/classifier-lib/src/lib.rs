//! Skill classifier library
//!
//! This crate provides the core functionality for:
//! - Loading a pre-trained text classifier artifact
//! - Running single and batch predictions
//! - Request/response models for the prediction endpoint
//! - Health checks and observability

pub mod artifact;
pub mod classifier;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;

pub use artifact::{load_artifact, LoadedArtifact};
pub use classifier::{Classifier, LinearModelArtifact, LinearTextClassifier};
pub use error::{ArtifactError, ClassifierError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::{PredictRequest, PredictResponse, QUESTION_REQUIRED};
pub use observability::{RequestErrorKind, ServiceMetrics, StructuredLogger};

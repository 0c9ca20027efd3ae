//! Text classification engine

mod linear;

pub use linear::{LinearModelArtifact, LinearTextClassifier, ARTIFACT_FORMAT_VERSION};

use crate::error::Result;

/// Trait for text classifier implementations
///
/// A classifier is loaded once at startup and shared read-only across
/// requests, so implementations must not rely on interior mutation.
pub trait Classifier: Send + Sync {
    /// Predict one label per input, in input order
    fn predict(&self, inputs: &[String]) -> Result<Vec<String>>;
}

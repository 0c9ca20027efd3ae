//! Linear bag-of-words classifier
//!
//! Runs inference for a model exported by the external training job as
//! JSON: a vocabulary mapping terms to columns, one weight row and one
//! intercept per label. Each input scores every label as `w·x + b` and
//! the highest-scoring label wins.

use super::Classifier;
use crate::error::{ArtifactError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Artifact format version understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Minimum token length in characters, matching the training tokenizer
const MIN_TOKEN_CHARS: usize = 2;

/// Serialized form of the trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub format_version: u32,
    pub labels: Vec<String>,
    pub vocabulary: HashMap<String, usize>,
    /// One row per label, one column per vocabulary term
    pub weights: Vec<Vec<f32>>,
    pub intercepts: Vec<f32>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    /// L2-normalize term counts before scoring
    #[serde(default)]
    pub normalize: bool,
}

fn default_lowercase() -> bool {
    true
}

impl LinearModelArtifact {
    /// Check the artifact is internally consistent
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported format_version {}, expected {}",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        if self.labels.is_empty() {
            return Err(ArtifactError::Invalid("model has no labels".to_string()));
        }

        if self.weights.len() != self.labels.len() {
            return Err(ArtifactError::Invalid(format!(
                "{} weight rows for {} labels",
                self.weights.len(),
                self.labels.len()
            )));
        }

        if self.intercepts.len() != self.labels.len() {
            return Err(ArtifactError::Invalid(format!(
                "{} intercepts for {} labels",
                self.intercepts.len(),
                self.labels.len()
            )));
        }

        let columns = self.vocabulary.len();
        for (label, row) in self.labels.iter().zip(&self.weights) {
            if row.len() != columns {
                return Err(ArtifactError::Invalid(format!(
                    "weight row for '{}' has {} columns, vocabulary has {}",
                    label,
                    row.len(),
                    columns
                )));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(ArtifactError::Invalid(format!(
                    "weight row for '{}' contains non-finite values",
                    label
                )));
            }
        }

        if self.intercepts.iter().any(|b| !b.is_finite()) {
            return Err(ArtifactError::Invalid(
                "intercepts contain non-finite values".to_string(),
            ));
        }

        if let Some((term, column)) = self.vocabulary.iter().find(|(_, column)| **column >= columns) {
            return Err(ArtifactError::Invalid(format!(
                "vocabulary term '{}' maps to column {} (vocabulary size {})",
                term, column, columns
            )));
        }

        Ok(())
    }
}

/// Split text into word tokens of at least two word characters
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
}

/// Classifier backed by a validated [`LinearModelArtifact`]
#[derive(Debug, Clone)]
pub struct LinearTextClassifier {
    model: LinearModelArtifact,
}

impl LinearTextClassifier {
    /// Build a classifier from a deserialized artifact
    pub fn from_artifact(model: LinearModelArtifact) -> Result<Self, ArtifactError> {
        model.validate()?;
        debug!(
            labels = model.labels.len(),
            vocabulary = model.vocabulary.len(),
            "Linear text model ready"
        );
        Ok(Self { model })
    }

    pub fn labels(&self) -> &[String] {
        &self.model.labels
    }

    /// Sparse term-count vector over the vocabulary
    fn features(&self, text: &str) -> Vec<(usize, f32)> {
        let mut counts: HashMap<usize, f32> = HashMap::new();

        for token in tokenize(text) {
            let column = if self.model.lowercase {
                self.model.vocabulary.get(&token.to_lowercase())
            } else {
                self.model.vocabulary.get(token)
            };
            if let Some(&column) = column {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut features: Vec<(usize, f32)> = counts.into_iter().collect();

        if self.model.normalize {
            let norm = features.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for (_, value) in features.iter_mut() {
                    *value /= norm;
                }
            }
        }

        features
    }

    /// Score every label for one input
    pub fn scores(&self, text: &str) -> Vec<f32> {
        let features = self.features(text);

        self.model
            .weights
            .iter()
            .zip(&self.model.intercepts)
            .map(|(row, intercept)| {
                intercept + features.iter().map(|&(col, x)| row[col] * x).sum::<f32>()
            })
            .collect()
    }

    /// Highest-scoring label for one input; the earliest label wins ties
    pub fn classify(&self, text: &str) -> &str {
        let scores = self.scores(text);

        let mut best = 0;
        for (idx, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = idx;
            }
        }

        &self.model.labels[best]
    }
}

impl Classifier for LinearTextClassifier {
    fn predict(&self, inputs: &[String]) -> Result<Vec<String>> {
        Ok(inputs
            .iter()
            .map(|text| self.classify(text).to_string())
            .collect())
    }
}

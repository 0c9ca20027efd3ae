//! Classifier artifact loading
//!
//! The artifact is read once at startup, checksummed, parsed and validated.
//! Any failure here is fatal for the service.

use crate::classifier::{Classifier, LinearModelArtifact, LinearTextClassifier};
use crate::error::ArtifactError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A classifier loaded from disk along with its provenance
#[derive(Clone)]
pub struct LoadedArtifact {
    pub classifier: Arc<dyn Classifier>,
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the artifact bytes
    pub checksum: String,
    pub size_bytes: usize,
    pub labels: Vec<String>,
}

impl std::fmt::Debug for LoadedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedArtifact")
            .field("path", &self.path)
            .field("checksum", &self.checksum)
            .field("size_bytes", &self.size_bytes)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

/// Calculate SHA256 checksum of data
pub fn calculate_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Load and validate the classifier artifact at `path`
///
/// When `expected_sha256` is set the artifact bytes must hash to it
/// (compared case-insensitively).
pub fn load_artifact(
    path: impl AsRef<Path>,
    expected_sha256: Option<&str>,
) -> Result<LoadedArtifact, ArtifactError> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound(path.to_path_buf())
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let checksum = calculate_checksum(&bytes);
    if let Some(expected) = expected_sha256 {
        if !expected.eq_ignore_ascii_case(&checksum) {
            return Err(ArtifactError::ChecksumMismatch {
                expected: expected.to_string(),
                actual: checksum,
            });
        }
    }

    let model: LinearModelArtifact = serde_json::from_slice(&bytes)?;
    let classifier = LinearTextClassifier::from_artifact(model)?;
    let labels = classifier.labels().to_vec();

    debug!(
        path = %path.display(),
        checksum = %checksum,
        size_bytes = bytes.len(),
        "Classifier artifact parsed"
    );

    Ok(LoadedArtifact {
        classifier: Arc::new(classifier),
        path: path.to_path_buf(),
        checksum,
        size_bytes: bytes.len(),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const ARTIFACT_JSON: &str = r#"{
        "format_version": 1,
        "labels": ["algorithms", "data-structures"],
        "vocabulary": {"linked": 0, "list": 1, "sort": 2},
        "weights": [[0.0, 0.0, 1.5], [1.0, 1.0, 0.0]],
        "intercepts": [0.1, 0.0]
    }"#;

    fn write_artifact(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_artifact_success() {
        let file = write_artifact(ARTIFACT_JSON);

        let loaded = load_artifact(file.path(), None).unwrap();

        assert_eq!(loaded.labels, vec!["algorithms", "data-structures"]);
        assert_eq!(loaded.size_bytes, ARTIFACT_JSON.len());
        assert_eq!(loaded.checksum, calculate_checksum(ARTIFACT_JSON.as_bytes()));

        let labels = loaded
            .classifier
            .predict(&["Reverse a linked list".to_string()])
            .unwrap();
        assert_eq!(labels, vec!["data-structures"]);
    }

    #[test]
    fn test_load_artifact_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skill_classifier.json");

        let err = load_artifact(&path, None).unwrap_err();

        assert!(matches!(err, ArtifactError::NotFound(ref p) if p == &path));
        assert!(err.to_string().contains("skill_classifier.json"));
    }

    #[test]
    fn test_load_artifact_malformed_json() {
        let file = write_artifact("{ not json");

        let err = load_artifact(file.path(), None).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn test_load_artifact_invalid_model() {
        let file = write_artifact(
            r#"{"format_version": 1, "labels": [], "vocabulary": {}, "weights": [], "intercepts": []}"#,
        );

        let err = load_artifact(file.path(), None).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn test_load_artifact_checksum_verification() {
        let file = write_artifact(ARTIFACT_JSON);
        let checksum = calculate_checksum(ARTIFACT_JSON.as_bytes());

        assert!(load_artifact(file.path(), Some(&checksum.to_uppercase())).is_ok());

        let err = load_artifact(file.path(), Some("deadbeef")).unwrap_err();
        match err {
            ArtifactError::ChecksumMismatch { expected, actual } => {
                assert_eq!(expected, "deadbeef");
                assert_eq!(actual, checksum);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sample_artifact_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../models/skill_classifier.sample.json");

        let loaded = load_artifact(&path, None).unwrap();
        assert_eq!(loaded.labels.len(), 4);

        let questions = vec![
            "Reverse a linked list".to_string(),
            "Write a SQL query with a join".to_string(),
            "Implement binary search".to_string(),
            "Render a React component from a REST API".to_string(),
        ];
        let labels = loaded.classifier.predict(&questions).unwrap();
        assert_eq!(
            labels,
            vec!["data-structures", "databases", "algorithms", "web-development"]
        );
    }

    #[test]
    fn test_calculate_checksum() {
        assert_eq!(
            calculate_checksum(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}

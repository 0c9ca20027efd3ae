//! Request and response shapes for the prediction endpoint

use serde::{Deserialize, Serialize};

/// Error message returned when the request carries no question text
pub const QUESTION_REQUIRED: &str = "Question text is required";

/// Body of a `POST /predict` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub question: String,
}

/// Body of a `POST /predict` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Prediction { skill_tested: String },
    Error { error: String },
}

impl PredictResponse {
    pub fn prediction(label: impl Into<String>) -> Self {
        Self::Prediction {
            skill_tested: label.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

//! API client for the prediction service

use anyhow::{Context, Result};
use classifier_lib::{HealthResponse, PredictRequest, PredictResponse, ReadinessResponse};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// HTTP client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Ask the service which skill a question tests
    pub async fn predict(&self, question: &str) -> Result<String> {
        let url = self.base_url.join("predict").context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(&PredictRequest {
                question: question.to_string(),
            })
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body: PredictResponse = decode(response).await?;

        match body {
            PredictResponse::Prediction { skill_tested } if status.is_success() => {
                Ok(skill_tested)
            }
            PredictResponse::Prediction { .. } => {
                anyhow::bail!("API error ({}): unexpected prediction body", status)
            }
            PredictResponse::Error { error } => anyhow::bail!("API error ({}): {}", status, error),
        }
    }

    /// Fetch `/healthz`; 503 still carries a health body
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get_status("healthz").await
    }

    /// Fetch `/readyz`; 503 still carries a readiness body
    pub async fn readiness(&self) -> Result<ReadinessResponse> {
        self.get_status("readyz").await
    }

    async fn get_status<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json().await.context("Failed to parse response")
}

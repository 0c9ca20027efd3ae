//! Service configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Optional config file name, looked up in the working directory
const CONFIG_FILE: &str = "prediction-service";

/// Environment variable prefix, e.g. `PREDICTOR_PORT=5001`
const ENV_PREFIX: &str = "PREDICTOR";

/// Prediction service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Classifier artifact, relative to the working directory unless absolute
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Expected hex SHA-256 of the artifact; unchecked when unset
    #[serde(default)]
    pub artifact_sha256: Option<String>,

    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub log_json: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("skill_classifier.json")
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            artifact_path: default_artifact_path(),
            artifact_sha256: None,
            log_json: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `prediction-service.{toml,json,yaml}` and the environment
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Socket address string to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

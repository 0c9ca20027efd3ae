//! Skill prediction service
//!
//! Serves `POST /predict` over a classifier artifact loaded once at
//! startup, plus health endpoints and Prometheus metrics.

pub mod api;
pub mod config;
pub mod startup;

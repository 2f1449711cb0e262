use serde::{Deserialize, Serialize};

/// Response for the predict endpoint
///
/// Every handler-level outcome is reported through this body; the status
/// code does not distinguish success from failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success { predicted_rent: f64 },
    Failure { error: String },
}

impl PredictionResponse {
    pub fn error(message: impl Into<String>) -> Self {
        PredictionResponse::Failure {
            error: message.into(),
        }
    }
}

/// Root endpoint greeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub features: usize,
}

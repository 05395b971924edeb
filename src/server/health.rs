//! Health endpoint

use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthBody {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl HealthBody {
    pub fn now() -> Self {
        Self {
            status: "ok".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

pub async fn health_handler() -> Json<HealthBody> {
    Json(HealthBody::now())
}

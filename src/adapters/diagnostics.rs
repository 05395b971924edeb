//! Health endpoint client
//!
//! Polls a docship host's `/health` endpoint. The body is parsed leniently:
//! a missing or malformed `version` or `timestamp` field becomes `None`
//! instead of failing the probe.

use crate::domain::errors::DocshipError;
use crate::domain::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Placeholder printed for missing fields
pub const UNAVAILABLE: &str = "unavailable";

/// What a health probe learned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub http_status: u16,
    pub status: Option<String>,
    pub service: Option<String>,
    pub version: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl HealthStatus {
    /// Parse a health body; never fails
    pub fn from_body(http_status: u16, body: &str) -> Self {
        let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        Self {
            http_status,
            status: string_field(&value, "status"),
            service: string_field(&value, "service"),
            version: string_field(&value, "version"),
            timestamp: value.get("timestamp").and_then(epoch_millis),
        }
    }

    /// Healthy means a 2xx response reporting `"status": "ok"`
    pub fn is_healthy(&self) -> bool {
        (200..300).contains(&self.http_status) && self.status.as_deref() == Some("ok")
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HTTP status: {}", self.http_status)?;
        writeln!(f, "Status:      {}", self.status.as_deref().unwrap_or(UNAVAILABLE))?;
        writeln!(f, "Service:     {}", self.service.as_deref().unwrap_or(UNAVAILABLE))?;
        writeln!(f, "Version:     {}", self.version.as_deref().unwrap_or(UNAVAILABLE))?;
        match self.timestamp {
            Some(ts) => write!(f, "Timestamp:   {}", ts.to_rfc3339()),
            None => write!(f, "Timestamp:   {UNAVAILABLE}"),
        }
    }
}

fn string_field(value: &Value, name: &str) -> Option<String> {
    match value.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn epoch_millis(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Utc.timestamp_millis_opt(millis).single()
}

/// Client for a remote `/health` endpoint
#[derive(Debug, Clone)]
pub struct HealthClient {
    client: reqwest::Client,
    url: String,
}

impl HealthClient {
    /// `base_url` may be the host root or the full `/health` URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = base_url.trim_end_matches('/');
        let url = if base.ends_with("/health") {
            base.to_string()
        } else {
            format!("{base}/health")
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocshipError::Connection(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe the endpoint
    ///
    /// # Errors
    ///
    /// Returns a connection error only when no HTTP response was received.
    pub async fn check(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DocshipError::Connection(format!("{}: {e}", self.url)))?;

        let http_status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(HealthStatus::from_body(http_status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_body() {
        let status = HealthStatus::from_body(
            200,
            r#"{"status":"ok","service":"docship","version":"0.1.0","timestamp":1714564800000}"#,
        );
        assert!(status.is_healthy());
        assert_eq!(status.version.as_deref(), Some("0.1.0"));
        assert_eq!(status.timestamp.unwrap().timestamp(), 1_714_564_800);
    }

    #[test]
    fn test_missing_fields_degrade() {
        let status = HealthStatus::from_body(200, r#"{"status":"ok"}"#);
        assert!(status.version.is_none());
        assert!(status.timestamp.is_none());

        let printed = status.to_string();
        assert!(printed.contains("Version:     unavailable"));
        assert!(printed.contains("Timestamp:   unavailable"));
    }

    #[test]
    fn test_garbled_fields_degrade() {
        let status = HealthStatus::from_body(
            200,
            r#"{"status":"ok","version":{"major":1},"timestamp":"yesterday"}"#,
        );
        assert!(status.version.is_none());
        assert!(status.timestamp.is_none());
    }

    #[test]
    fn test_non_json_body() {
        let status = HealthStatus::from_body(502, "<html>Bad Gateway</html>");
        assert!(!status.is_healthy());
        assert!(status.status.is_none());
    }

    #[test]
    fn test_string_timestamp_and_numeric_version() {
        let status = HealthStatus::from_body(200, r#"{"version":2,"timestamp":"1000"}"#);
        assert_eq!(status.version.as_deref(), Some("2"));
        assert_eq!(status.timestamp.unwrap().timestamp_millis(), 1000);
    }

    #[test]
    fn test_url_normalisation() {
        let client = HealthClient::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(), "http://localhost:8080/health");
        let client =
            HealthClient::new("http://localhost:8080/health", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url(), "http://localhost:8080/health");
    }
}

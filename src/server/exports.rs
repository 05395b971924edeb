//! Export endpoint
//!
//! `POST /exports/:record_id` takes an optional JSON body and answers with
//! either the delivery link or a stable error body derived from the failure
//! kind. Raw transport errors never reach the client.

use super::AppState;
use crate::domain::export::{DeliveryLink, ExportFailure, ExportRequest, FailureKind};
use crate::domain::ids::RecordId;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Optional request body
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportBody {
    pub timeout_seconds: Option<u64>,
    pub link_ttl_seconds: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub link: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub storage_key: String,
    pub checksum: String,
}

impl From<&DeliveryLink> for ExportResponse {
    fn from(link: &DeliveryLink) -> Self {
        Self {
            link: link.url().to_string(),
            expires_at: link.expires_at(),
            storage_key: link.object().key().to_string(),
            checksum: link.object().checksum().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub stage: Option<String>,
    pub message: String,
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl ErrorBody {
    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: "invalid_request".to_string(),
            stage: None,
            message: message.into(),
            retryable: false,
            attempts: None,
        }
    }
}

impl From<&ExportFailure> for ErrorBody {
    fn from(failure: &ExportFailure) -> Self {
        Self {
            kind: failure.kind.to_string(),
            stage: Some(failure.stage.to_string()),
            message: failure.user_message().to_string(),
            retryable: failure.is_retryable(),
            attempts: failure.attempts,
        }
    }
}

pub(crate) fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::AuthFailure => StatusCode::UNAUTHORIZED,
        FailureKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn parse_body(body: &Bytes) -> Result<ExportBody, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ExportBody::default());
    }
    serde_json::from_slice(body).map_err(|e| format!("Invalid request body: {e}"))
}

pub async fn export_handler(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    body: Bytes,
) -> Response {
    let record_id = match RecordId::new(record_id) {
        Ok(id) => id,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::invalid_request(e))).into_response()
        }
    };
    let options = match parse_body(&body) {
        Ok(options) => options,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorBody::invalid_request(e))).into_response()
        }
    };

    let mut request = ExportRequest::new(record_id);
    if let Some(secs) = options.timeout_seconds {
        request = request.with_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = options.link_ttl_seconds {
        request = request.with_link_ttl(Duration::from_secs(secs));
    }

    match state.orchestrator.export(request).await.into_result() {
        Ok(link) => (StatusCode::OK, Json(ExportResponse::from(&link))).into_response(),
        Err(failure) => {
            (status_for(failure.kind), Json(ErrorBody::from(&failure))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export::ExportStage;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(FailureKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(FailureKind::AuthFailure), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(FailureKind::Timeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(status_for(FailureKind::UploadExhausted), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(FailureKind::SigningFailure), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_error_body_uses_user_message() {
        let failure = ExportFailure::new(
            FailureKind::UploadExhausted,
            ExportStage::Uploading,
            "connection reset (3)",
        )
        .with_attempts(3);
        let body = ErrorBody::from(&failure);

        assert_eq!(body.kind, "upload_exhausted");
        assert_eq!(body.stage.as_deref(), Some("uploading"));
        assert!(body.retryable);
        assert_eq!(body.attempts, Some(3));
        assert!(!body.message.contains("connection reset"));
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(&Bytes::new()).unwrap().timeout_seconds.is_none());
        assert_eq!(
            parse_body(&Bytes::from_static(b"{\"timeout_seconds\": 5}"))
                .unwrap()
                .timeout_seconds,
            Some(5)
        );
        assert!(parse_body(&Bytes::from_static(b"{\"bogus\": 1}")).is_err());
        assert!(parse_body(&Bytes::from_static(b"not json")).is_err());
    }
}

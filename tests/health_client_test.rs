//! Health client tests against a mock host

use docship::adapters::diagnostics::{HealthClient, UNAVAILABLE};
use mockito::Server;
use std::time::Duration;

#[tokio::test]
async fn test_full_health_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"ok","service":"docship","version":"1.2.3","timestamp":1714564800000}"#)
        .create_async()
        .await;

    let client = HealthClient::new(&server.url(), Duration::from_secs(2)).unwrap();
    let status = client.check().await.unwrap();

    assert!(status.is_healthy());
    assert_eq!(status.version.as_deref(), Some("1.2.3"));
    assert_eq!(status.timestamp.unwrap().timestamp_millis(), 1_714_564_800_000);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_fields_degrade_to_unavailable() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"ok","timestamp":"soon"}"#)
        .create_async()
        .await;

    let client = HealthClient::new(&format!("{}/health", server.url()), Duration::from_secs(2)).unwrap();
    let status = client.check().await.unwrap();

    assert!(status.version.is_none());
    assert!(status.timestamp.is_none());
    let rendered = status.to_string();
    assert!(rendered.contains(&format!("Version:     {UNAVAILABLE}")));
    assert!(rendered.contains(&format!("Timestamp:   {UNAVAILABLE}")));
}

#[tokio::test]
async fn test_garbled_body_is_unhealthy_not_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/health")
        .with_status(500)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let client = HealthClient::new(&server.url(), Duration::from_secs(2)).unwrap();
    let status = client.check().await.unwrap();

    assert_eq!(status.http_status, 500);
    assert!(!status.is_healthy());
    assert!(status.status.is_none());
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    let client = HealthClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
    assert!(client.check().await.is_err());
}

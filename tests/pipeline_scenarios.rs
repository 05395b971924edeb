//! End-to-end export scenarios against in-memory stores
//!
//! These tests verify that:
//! - Successful exports store the document once and return a link
//! - Each failure is reported with its kind and stage
//! - Retries reuse the same key and payload
//! - The overall deadline cancels the in-flight stage

use chrono::{TimeZone, Utc};
use docship::adapters::records::InMemoryRecordStore;
use docship::adapters::storage::{FaultPlan, InMemoryObjectStore};
use docship::core::checksum::calculate_checksum_bytes;
use docship::core::export::{ExportOrchestrator, ExportSettings};
use docship::core::upload::RetryPolicy;
use docship::domain::{
    ExportRequest, ExportStage, ExportState, FailureKind, LogRecord, RecordId, StorageError,
    StorageKey,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

fn record(id: &str) -> LogRecord {
    LogRecord::new(
        RecordId::new(id).unwrap(),
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        "error",
        "billing",
        format!("Record {id} failed"),
    )
    .with_field("invoice", "INV-9")
}

fn records() -> Arc<InMemoryRecordStore> {
    Arc::new(InMemoryRecordStore::with_records([
        record("42"),
        record("7"),
        record("13"),
    ]))
}

fn settings(max_attempts: u32) -> ExportSettings {
    ExportSettings::default().with_retry(RetryPolicy::immediate(max_attempts))
}

fn orchestrator(store: &Arc<InMemoryObjectStore>, max_attempts: u32) -> ExportOrchestrator {
    ExportOrchestrator::new(settings(max_attempts), records(), store.clone())
}

fn request(id: &str) -> ExportRequest {
    ExportRequest::new(RecordId::new(id).unwrap())
}

fn key(raw: &str) -> StorageKey {
    StorageKey::new(raw).unwrap()
}

#[tokio::test]
async fn test_existing_record_delivers_link() {
    let store = Arc::new(InMemoryObjectStore::new());
    let before = Utc::now();

    let link = orchestrator(&store, 3)
        .export(request("42"))
        .await
        .into_result()
        .unwrap();

    assert_eq!(link.object().key().as_str(), "exports/42");
    assert!(link.url().starts_with("memory://docship/exports/42?"));
    let ttl = (link.expires_at().unwrap() - before).num_seconds();
    assert!((899..=901).contains(&ttl), "ttl was {ttl}");

    let stored = store.object(&key("exports/42")).unwrap();
    assert_eq!(calculate_checksum_bytes(&stored), link.object().checksum());
    assert_eq!(
        store.content_type(&key("exports/42")).as_deref(),
        Some("application/msword")
    );
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn test_missing_record_is_not_found_while_building() {
    let store = Arc::new(InMemoryObjectStore::new());

    let failure = orchestrator(&store, 3)
        .export(request("99"))
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::NotFound);
    assert_eq!(failure.stage, ExportStage::Building);
    assert!(!failure.is_retryable());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_transient_faults_retried_with_same_payload() {
    let store = Arc::new(InMemoryObjectStore::new().with_faults(FaultPlan::new().fail_transient(2)));

    let link = orchestrator(&store, 3)
        .export(request("7"))
        .await
        .into_result()
        .unwrap();

    let attempts = store.attempts();
    assert_eq!(attempts.len(), 3);
    assert!(attempts.iter().all(|a| a.key.as_str() == "exports/7"));
    assert!(attempts.iter().all(|a| a.checksum == link.object().checksum()));
    assert_eq!(
        attempts.iter().map(|a| a.succeeded).collect::<Vec<_>>(),
        vec![false, false, true]
    );
    assert_eq!(store.object_count(), 1);
}

#[tokio::test]
async fn test_one_fault_short_of_the_limit_succeeds() {
    let store = Arc::new(InMemoryObjectStore::new().with_faults(FaultPlan::new().fail_transient(3)));

    let outcome = orchestrator(&store, 4).export(request("7")).await;

    assert!(outcome.is_success());
    assert_eq!(store.write_count(), 4);
}

#[tokio::test]
async fn test_exhausted_retries_report_attempt_count() {
    let store = Arc::new(InMemoryObjectStore::new().with_faults(FaultPlan::new().fail_transient(10)));

    let failure = orchestrator(&store, 3)
        .export(request("7"))
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::UploadExhausted);
    assert_eq!(failure.stage, ExportStage::Uploading);
    assert_eq!(failure.attempts, Some(3));
    assert!(failure.is_retryable());
    assert_eq!(store.write_count(), 3);
    assert_eq!(store.object_count(), 0);
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let store = Arc::new(InMemoryObjectStore::new().with_faults(
        FaultPlan::new().fail_write_with(StorageError::Unauthorized("token expired".into())),
    ));

    let failure = orchestrator(&store, 3)
        .export(request("42"))
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::AuthFailure);
    assert_eq!(failure.stage, ExportStage::Uploading);
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn test_timeout_during_upload_is_tagged_uploading() {
    let store = Arc::new(
        InMemoryObjectStore::new()
            .with_faults(FaultPlan::new().write_latency(Duration::from_secs(5))),
    );
    let orchestrator = orchestrator(&store, 3);
    let (state, _observer) = watch::channel(ExportState::Pending);

    let outcome = orchestrator
        .export_with_state(
            request("42").with_timeout(Duration::from_millis(200)),
            &state,
        )
        .await;

    let failure = outcome.into_result().unwrap_err();
    assert_eq!(failure.kind, FailureKind::Timeout);
    assert_eq!(failure.stage, ExportStage::Uploading);
    assert_eq!(*state.borrow(), ExportState::Failed(ExportStage::Uploading));
    assert_eq!(store.write_count(), 0);
    assert_eq!(store.object_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_write_finishing_after_deadline_never_succeeds() {
    let store = Arc::new(
        InMemoryObjectStore::new()
            .with_faults(FaultPlan::new().write_latency(Duration::from_secs(5))),
    );
    let orchestrator = orchestrator(&store, 3);
    let (state, observer) = watch::channel(ExportState::Pending);

    let outcome = orchestrator
        .export_with_state(request("42").with_timeout(Duration::from_secs(1)), &state)
        .await;
    let failure = outcome.into_result().unwrap_err();
    assert_eq!((failure.kind, failure.stage), (FailureKind::Timeout, ExportStage::Uploading));

    // Well past the point where the cancelled write would have completed
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(*observer.borrow(), ExportState::Failed(ExportStage::Uploading));
    assert_eq!(store.write_count(), 0);
    assert_eq!(store.object_count(), 0);
}

#[tokio::test]
async fn test_repeated_export_reuses_key_and_checksum() {
    let store = Arc::new(InMemoryObjectStore::new());
    let orchestrator = orchestrator(&store, 3);

    let first = orchestrator.export(request("42")).await.into_result().unwrap();
    let second = orchestrator.export(request("42")).await.into_result().unwrap();

    assert_eq!(first.object().key(), second.object().key());
    assert_eq!(first.object().checksum(), second.object().checksum());
    assert_eq!(store.object_count(), 1);
}

#[tokio::test]
async fn test_permanent_link_platform_ignores_ttl() {
    let store = Arc::new(InMemoryObjectStore::permanent());

    let link = orchestrator(&store, 3)
        .export(request("42").with_link_ttl(Duration::from_secs(60)))
        .await
        .into_result()
        .unwrap();

    assert!(link.expires_at().is_none());
    assert_eq!(link.url(), "memory://docship/exports/42");
}

#[tokio::test]
async fn test_signing_failure_keeps_uploaded_object() {
    let store = Arc::new(InMemoryObjectStore::without_signing());

    let failure = orchestrator(&store, 3)
        .export(request("42"))
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::SigningFailure);
    assert_eq!(failure.stage, ExportStage::LinkIssuing);
    assert_eq!(store.object_count(), 1);
}

#[tokio::test]
async fn test_tenant_scopes_storage_key() {
    let store = Arc::new(InMemoryObjectStore::new());
    let orchestrator =
        ExportOrchestrator::new(settings(3).with_tenant("acme"), records(), store.clone());

    let link = orchestrator.export(request("42")).await.into_result().unwrap();

    assert_eq!(link.object().key().as_str(), "acme/exports/42");
}

#[tokio::test]
async fn test_batch_summary_in_request_order() {
    let store = Arc::new(InMemoryObjectStore::new());
    let orchestrator = orchestrator(&store, 3);

    let summary = orchestrator
        .export_many(vec![request("42"), request("99"), request("7"), request("13")])
        .await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures_by_kind.get(&FailureKind::NotFound), Some(&1));
    assert_eq!(summary.success_rate(), 75.0);

    let order: Vec<&str> = summary.results.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(order, vec!["42", "99", "7", "13"]);
    assert!(!summary.results[1].1.is_success());
    assert_eq!(store.object_count(), 3);
}

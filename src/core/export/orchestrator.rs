//! Export orchestrator
//!
//! Sequences build, upload and link issuing for one request under a single
//! deadline, and packages whatever happens into an [`ExportOutcome`]. Lower
//! stages return their own error types; this is the only place they are mapped
//! onto [`FailureKind`].

use super::settings::ExportSettings;
use super::summary::ExportSummary;
use crate::adapters::records::{FsRecordStore, RecordStore};
use crate::adapters::storage::{create_object_store, ObjectStore};
use crate::config::DocshipConfig;
use crate::core::builder::{DocumentBuilder, DocumentRenderer};
use crate::core::link::LinkBroker;
use crate::core::upload::UploadManager;
use crate::domain::errors::{BuildError, LinkError, UploadError};
use crate::domain::export::{
    DeliveryLink, ExportFailure, ExportOutcome, ExportRequest, ExportStage, ExportState,
    FailureKind,
};
use crate::domain::ids::{RecordId, StorageKey};
use crate::domain::Result;
use crate::{log_export_complete, log_stage_transition};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::Instrument;

/// Public entry point of the export pipeline
///
/// Holds no per-invocation state; share one orchestrator across tasks.
pub struct ExportOrchestrator {
    builder: DocumentBuilder,
    uploader: UploadManager,
    links: LinkBroker,
    settings: ExportSettings,
}

impl ExportOrchestrator {
    pub fn new(
        settings: ExportSettings,
        records: Arc<dyn RecordStore>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let builder = DocumentBuilder::new(records, settings.key_prefix.clone())
            .with_tenant(settings.tenant.clone());
        let uploader = UploadManager::new(Arc::clone(&store), settings.retry.clone());
        let links = LinkBroker::new(store, settings.default_link_ttl);

        Self {
            builder,
            uploader,
            links,
            settings,
        }
    }

    /// Wire the filesystem record store and the configured object store
    ///
    /// # Errors
    ///
    /// Returns an error if the object store cannot be created
    pub fn from_config(config: &DocshipConfig) -> Result<Self> {
        let records: Arc<dyn RecordStore> = Arc::new(FsRecordStore::new(&config.records.path));
        let store = create_object_store(&config.storage)?;

        tracing::debug!(
            records = %config.records.path,
            store = store.name(),
            "Export orchestrator configured"
        );

        Ok(Self::new(ExportSettings::from_config(config), records, store))
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.builder = self.builder.with_renderer(renderer);
        self
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.builder = self.builder.with_scratch_dir(dir);
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// The key a request's document is stored under
    pub fn storage_key(&self, request: &ExportRequest) -> StorageKey {
        self.builder.storage_key(request)
    }

    /// Export one record
    pub async fn export(&self, request: ExportRequest) -> ExportOutcome {
        let (state, _observer) = watch::channel(ExportState::Pending);
        self.export_with_state(request, &state).await
    }

    /// Export one record, publishing every state transition on `state`
    ///
    /// `state` should start out as [`ExportState::Pending`].
    pub async fn export_with_state(
        &self,
        request: ExportRequest,
        state: &watch::Sender<ExportState>,
    ) -> ExportOutcome {
        let started = Instant::now();
        let record_id = request.record_id().clone();
        let deadline = request.timeout().unwrap_or(self.settings.overall_timeout);
        let span = tracing::info_span!(
            "export",
            record_id = %record_id,
            request_id = %request.request_id()
        );

        async move {
            let result = match tokio::time::timeout(deadline, self.run(&request, state)).await {
                Ok(result) => result,
                Err(_) => {
                    let stage = state.borrow().in_flight().unwrap_or(ExportStage::Building);
                    Err(ExportFailure::new(
                        FailureKind::Timeout,
                        stage,
                        format!("export exceeded its {}ms deadline", deadline.as_millis()),
                    ))
                }
            };

            match &result {
                Ok(link) => {
                    transition(&record_id, state, ExportState::Succeeded);
                    log_export_complete!(&record_id, link.object().key(), started.elapsed());
                }
                Err(failure) => {
                    transition(&record_id, state, ExportState::Failed(failure.stage));
                    match failure.kind {
                        FailureKind::NotFound => {
                            tracing::info!(kind = %failure.kind, stage = %failure.stage, "Export failed: {}", failure.cause)
                        }
                        _ => {
                            tracing::error!(kind = %failure.kind, stage = %failure.stage, attempts = failure.attempts, "Export failed: {}", failure.cause)
                        }
                    }
                }
            }

            ExportOutcome::from(result)
        }
        .instrument(span)
        .await
    }

    /// Export many records concurrently, bounded by `max_concurrency`
    ///
    /// Results in the summary follow the order of `requests`.
    pub async fn export_many(&self, requests: Vec<ExportRequest>) -> ExportSummary {
        let started = Instant::now();
        let concurrency = self.settings.max_concurrency.max(1);

        tracing::info!(requests = requests.len(), concurrency, "Starting batch export");

        let mut outcomes: Vec<(usize, RecordId, ExportOutcome)> =
            stream::iter(requests.into_iter().enumerate())
                .map(|(index, request)| async move {
                    let record_id = request.record_id().clone();
                    (index, record_id, self.export(request).await)
                })
                .buffer_unordered(concurrency)
                .collect()
                .await;
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut summary = ExportSummary::new();
        for (_, record_id, outcome) in outcomes {
            summary.record(record_id, outcome);
        }
        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        summary
    }

    async fn run(
        &self,
        request: &ExportRequest,
        state: &watch::Sender<ExportState>,
    ) -> std::result::Result<DeliveryLink, ExportFailure> {
        let record_id = request.record_id();

        transition(record_id, state, ExportState::Building);
        let artifact = self.builder.build(request).await.map_err(classify_build)?;

        transition(record_id, state, ExportState::Uploading);
        let stored = self.uploader.upload(artifact).await.map_err(classify_upload)?;

        transition(record_id, state, ExportState::LinkIssuing);
        self.links
            .issue_link(stored, request.link_ttl())
            .await
            .map_err(classify_link)
    }
}

/// Apply a forward transition; illegal transitions leave the state untouched
fn transition(record_id: &RecordId, state: &watch::Sender<ExportState>, next: ExportState) {
    state.send_if_modified(|current| match current.advance(next) {
        Some(advanced) => {
            log_stage_transition!(record_id, *current, advanced);
            *current = advanced;
            true
        }
        None => {
            tracing::warn!(record_id = %record_id, from = ?*current, to = ?next, "Ignoring illegal state transition");
            false
        }
    });
}

fn classify_build(err: BuildError) -> ExportFailure {
    let kind = match &err {
        BuildError::NotFound(_) => FailureKind::NotFound,
        BuildError::Source(_) | BuildError::RenderFailure(_) => FailureKind::RenderFailure,
    };
    ExportFailure::new(kind, ExportStage::Building, err.to_string())
}

fn classify_upload(err: UploadError) -> ExportFailure {
    match &err {
        UploadError::Exhausted { attempts, .. } => {
            let attempts = *attempts;
            ExportFailure::new(FailureKind::UploadExhausted, ExportStage::Uploading, err.to_string())
                .with_attempts(attempts)
        }
        UploadError::Auth(_) => {
            ExportFailure::new(FailureKind::AuthFailure, ExportStage::Uploading, err.to_string())
        }
        UploadError::Rejected(_) => {
            ExportFailure::new(FailureKind::UploadRejected, ExportStage::Uploading, err.to_string())
        }
    }
}

fn classify_link(err: LinkError) -> ExportFailure {
    let kind = match &err {
        LinkError::Signing(_) => FailureKind::SigningFailure,
        LinkError::Auth(_) => FailureKind::AuthFailure,
    };
    ExportFailure::new(kind, ExportStage::LinkIssuing, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::records::InMemoryRecordStore;
    use crate::adapters::storage::InMemoryObjectStore;
    use crate::domain::record::LogRecord;
    use chrono::Utc;

    fn orchestrator(store: Arc<InMemoryObjectStore>) -> ExportOrchestrator {
        let records = Arc::new(InMemoryRecordStore::with_records([LogRecord::new(
            RecordId::new("42").unwrap(),
            Utc::now(),
            "info",
            "api",
            "hello",
        )]));
        ExportOrchestrator::new(ExportSettings::default(), records, store)
    }

    fn request(id: &str) -> ExportRequest {
        ExportRequest::new(RecordId::new(id).unwrap())
    }

    #[test]
    fn test_classify_upload_keeps_attempts() {
        let failure = classify_upload(UploadError::Exhausted {
            attempts: 3,
            last_cause: "reset".to_string(),
        });
        assert_eq!(failure.kind, FailureKind::UploadExhausted);
        assert_eq!(failure.stage, ExportStage::Uploading);
        assert_eq!(failure.attempts, Some(3));
    }

    #[test]
    fn test_classify_link_auth() {
        let failure = classify_link(LinkError::Auth("expired".to_string()));
        assert_eq!(failure.kind, FailureKind::AuthFailure);
        assert_eq!(failure.stage, ExportStage::LinkIssuing);
    }

    #[test]
    fn test_classify_build_source_is_render_failure() {
        let failure = classify_build(BuildError::Source("disk gone".to_string()));
        assert_eq!(failure.kind, FailureKind::RenderFailure);
        assert_eq!(failure.stage, ExportStage::Building);
    }

    #[test]
    fn test_illegal_transition_ignored() {
        let id = RecordId::new("1").unwrap();
        let (state, _rx) = watch::channel(ExportState::Pending);
        transition(&id, &state, ExportState::Uploading);
        assert_eq!(*state.borrow(), ExportState::Pending);
        transition(&id, &state, ExportState::Building);
        assert_eq!(*state.borrow(), ExportState::Building);
    }

    #[tokio::test]
    async fn test_state_ends_succeeded() {
        let orchestrator = orchestrator(Arc::new(InMemoryObjectStore::new()));
        let (state, _rx) = watch::channel(ExportState::Pending);
        let outcome = orchestrator.export_with_state(request("42"), &state).await;
        assert!(outcome.is_success());
        assert_eq!(*state.borrow(), ExportState::Succeeded);
    }

    #[tokio::test]
    async fn test_state_ends_failed_building() {
        let orchestrator = orchestrator(Arc::new(InMemoryObjectStore::new()));
        let (state, _rx) = watch::channel(ExportState::Pending);
        let outcome = orchestrator.export_with_state(request("99"), &state).await;
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::NotFound);
        assert_eq!(*state.borrow(), ExportState::Failed(ExportStage::Building));
    }

    #[tokio::test]
    async fn test_signing_failure_tagged_link_issuing() {
        let orchestrator = orchestrator(Arc::new(InMemoryObjectStore::without_signing()));
        let failure = orchestrator.export(request("42")).await.into_result().unwrap_err();
        assert_eq!(failure.kind, FailureKind::SigningFailure);
        assert_eq!(failure.stage, ExportStage::LinkIssuing);
    }
}

//! Batch export summary
//!
//! Aggregates the outcomes of [`ExportOrchestrator::export_many`](super::ExportOrchestrator::export_many).

use crate::domain::export::{ExportOutcome, FailureKind};
use crate::domain::ids::RecordId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Summary of a batch export
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Number of requests processed
    pub total: usize,

    /// Number of requests that produced a link
    pub succeeded: usize,

    /// Number of failed requests
    pub failed: usize,

    /// Failures grouped by kind
    pub failures_by_kind: BTreeMap<FailureKind, usize>,

    /// Wall-clock duration of the batch
    pub duration: Duration,

    /// Per-record outcomes, in request order
    pub results: Vec<(RecordId, ExportOutcome)>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            failures_by_kind: BTreeMap::new(),
            duration: Duration::from_secs(0),
            results: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add one outcome
    pub fn record(&mut self, record_id: RecordId, outcome: ExportOutcome) {
        self.total += 1;
        match &outcome {
            ExportOutcome::Delivered(_) => self.succeeded += 1,
            ExportOutcome::Failed(failure) => {
                self.failed += 1;
                *self.failures_by_kind.entry(failure.kind).or_insert(0) += 1;
            }
        }
        self.results.push((record_id, outcome));
    }

    /// Check if every export succeeded
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Whether every failure is of a kind worth retrying by hand
    pub fn all_failures_retryable(&self) -> bool {
        self.failures_by_kind.keys().all(FailureKind::is_retryable)
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total,
            succeeded = self.succeeded,
            failed = self.failed,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Batch export completed"
        );

        for (kind, count) in &self.failures_by_kind {
            tracing::warn!(kind = %kind, count, "Export failures");
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::export::{ExportFailure, ExportStage};

    fn failed(kind: FailureKind, stage: ExportStage) -> ExportOutcome {
        ExportOutcome::Failed(ExportFailure::new(kind, stage, "cause"))
    }

    fn id(raw: &str) -> RecordId {
        RecordId::new(raw).unwrap()
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new();
        assert_eq!(summary.total, 0);
        assert!(summary.is_successful());
        assert_eq!(summary.success_rate(), 100.0);
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new().with_duration(Duration::from_secs(120));
        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_failures_grouped_by_kind() {
        let mut summary = ExportSummary::new();
        summary.record(id("1"), failed(FailureKind::NotFound, ExportStage::Building));
        summary.record(id("2"), failed(FailureKind::NotFound, ExportStage::Building));
        summary.record(id("3"), failed(FailureKind::Timeout, ExportStage::Uploading));

        assert_eq!(summary.total, 3);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.failures_by_kind[&FailureKind::NotFound], 2);
        assert_eq!(summary.failures_by_kind[&FailureKind::Timeout], 1);
        assert!(!summary.is_successful());
        assert!(!summary.all_failures_retryable());
        assert_eq!(summary.results[2].0.as_str(), "3");
    }

    #[test]
    fn test_success_rate() {
        let mut summary = ExportSummary::new();
        summary.record(id("1"), failed(FailureKind::Timeout, ExportStage::LinkIssuing));
        summary.total = 4;
        summary.succeeded = 3;
        assert_eq!(summary.success_rate(), 75.0);
        assert!(summary.all_failures_retryable());
    }
}

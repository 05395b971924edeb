//! Export command implementation
//!
//! This module implements the `export` command. One record prints its link;
//! several run concurrently and print a summary.

use crate::config::load_config;
use crate::core::export::{ExportOrchestrator, ExportSummary};
use crate::domain::export::{ExportOutcome, ExportRequest};
use crate::domain::ids::RecordId;
use clap::Args;
use std::io::{self, Write};
use std::time::Duration;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Record identifier(s) to export
    #[arg(required = true, value_name = "RECORD_ID")]
    pub record_ids: Vec<String>,

    /// Link validity in seconds (defaults to export.default_link_ttl_seconds)
    #[arg(long, value_name = "SECONDS")]
    pub ttl: Option<u64>,

    /// Overall deadline per record in seconds (defaults to export.overall_timeout_seconds)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl ExportArgs {
    /// Build the requests, rejecting the first malformed identifier
    pub fn requests(&self) -> Result<Vec<ExportRequest>, String> {
        self.record_ids
            .iter()
            .map(|raw| {
                let mut request = ExportRequest::new(RecordId::new(raw.as_str())?);
                if let Some(ttl) = self.ttl {
                    request = request.with_link_ttl(Duration::from_secs(ttl));
                }
                if let Some(timeout) = self.timeout {
                    request = request.with_timeout(Duration::from_secs(timeout));
                }
                Ok(request)
            })
            .collect()
    }

    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(records = self.record_ids.len(), "Starting export command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let mut requests = match self.requests() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Invalid record identifier: {e}");
                return Ok(2);
            }
        };

        let orchestrator = match ExportOrchestrator::from_config(&config) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export orchestrator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(4);
            }
        };

        let (mut out, mut err) = (io::stdout(), io::stderr());

        if requests.len() == 1 {
            if let Some(request) = requests.pop() {
                let outcome = orchestrator.export(request).await;
                write_outcome(&outcome, &mut out, &mut err)?;
                return Ok(if outcome.is_success() { 0 } else { 1 });
            }
        }

        writeln!(err, "🚀 Exporting {} records...", requests.len())?;
        let summary = orchestrator.export_many(requests).await;
        write_summary(&summary, &mut out, &mut err)?;

        Ok(if summary.is_successful() { 0 } else { 1 })
    }
}

/// Links go to `out`; everything else goes to `err`
fn write_outcome(
    outcome: &ExportOutcome,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    match outcome {
        ExportOutcome::Delivered(link) => {
            writeln!(out, "{}", link.url())?;
            match link.expires_at() {
                Some(expires) => writeln!(err, "  Expires: {}", expires.to_rfc3339())?,
                None => writeln!(err, "  Expires: never")?,
            }
            writeln!(err, "  Storage key: {}", link.object().key())?;
            writeln!(err, "  Checksum: {}", link.object().checksum())?;
        }
        ExportOutcome::Failed(failure) => {
            writeln!(err, "❌ {}", failure.user_message())?;
            writeln!(err, "   Kind: {} (stage: {})", failure.kind, failure.stage)?;
            if let Some(attempts) = failure.attempts {
                writeln!(err, "   Attempts: {attempts}")?;
            }
            writeln!(err, "   Cause: {}", failure.cause)?;
            if failure.is_retryable() {
                writeln!(err, "   This failure is transient; retrying may succeed.")?;
            }
        }
    }
    Ok(())
}

/// One `<record-id> <link>` line per delivered record on `out`; failures and
/// totals on `err`
fn write_summary(
    summary: &ExportSummary,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    writeln!(err)?;
    for (record_id, outcome) in &summary.results {
        match outcome {
            ExportOutcome::Delivered(link) => writeln!(out, "{record_id} {}", link.url())?,
            ExportOutcome::Failed(failure) => writeln!(
                err,
                "  ❌ {record_id}: {} ({})",
                failure.kind,
                failure.user_message()
            )?,
        }
    }
    writeln!(err)?;
    writeln!(err, "📊 Export Summary:")?;
    writeln!(err, "  Total: {}", summary.total)?;
    writeln!(err, "  Succeeded: {}", summary.succeeded)?;
    writeln!(err, "  Failed: {}", summary.failed)?;
    for (kind, count) in &summary.failures_by_kind {
        writeln!(err, "    {kind}: {count}")?;
    }
    writeln!(err, "  Duration: {:.2}s", summary.duration.as_secs_f64())?;
    writeln!(err, "  Success Rate: {:.2}%", summary.success_rate())?;
    writeln!(err)?;

    if summary.is_successful() {
        writeln!(err, "✅ Export completed successfully!")?;
    } else if summary.all_failures_retryable() {
        writeln!(err, "⚠️  Export completed with transient failures; retry the failed records")?;
    } else {
        writeln!(err, "⚠️  Export completed with failures")?;
    }
    Ok(())
}

//! Logging and observability
//!
//! Structured logging through `tracing`, plus a few macros that keep field
//! names consistent across the pipeline (`record_id`, `stage`, `attempt`).
//!
//! # Example
//!
//! ```no_run
//! use docship::logging::init_logging;
//! use docship::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a pipeline state transition
///
/// # Example
///
/// ```
/// use docship::log_stage_transition;
/// use docship::domain::{ExportState, RecordId};
///
/// let record_id = RecordId::new("42").unwrap();
/// log_stage_transition!(&record_id, ExportState::Pending, ExportState::Building);
/// ```
#[macro_export]
macro_rules! log_stage_transition {
    ($record_id:expr, $from:expr, $to:expr) => {
        tracing::debug!(
            record_id = %$record_id,
            from = ?$from,
            to = ?$to,
            "Export state changed"
        );
    };
}

/// Log the completion of an export
///
/// # Example
///
/// ```
/// use docship::log_export_complete;
/// use docship::domain::RecordId;
/// use std::time::Duration;
///
/// let record_id = RecordId::new("42").unwrap();
/// log_export_complete!(&record_id, "exports/42", Duration::from_millis(120));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($record_id:expr, $storage_key:expr, $duration:expr) => {
        tracing::info!(
            record_id = %$record_id,
            storage_key = %$storage_key,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```
/// use docship::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!(2, 3, Duration::from_millis(400), "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay.as_millis() as u64,
            reason = %$reason,
            "Retrying upload"
        );
    };
}

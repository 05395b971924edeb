//! Orchestrator settings
//!
//! The explicit configuration an [`ExportOrchestrator`](super::ExportOrchestrator)
//! runs with. Storage endpoint and credentials are not here; they belong to the
//! object store built from `[storage]`.

use crate::config::DocshipConfig;
use crate::core::upload::RetryPolicy;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Link validity when a request does not ask for one
    pub default_link_ttl: Duration,
    /// Deadline spanning all three stages, unless a request overrides it
    pub overall_timeout: Duration,
    /// Upload attempts and backoff
    pub retry: RetryPolicy,
    pub key_prefix: String,
    pub tenant: Option<String>,
    /// Concurrent invocations in [`export_many`](super::ExportOrchestrator::export_many)
    pub max_concurrency: usize,
}

impl ExportSettings {
    pub fn from_config(config: &DocshipConfig) -> Self {
        let export = &config.export;
        Self {
            default_link_ttl: Duration::from_secs(export.default_link_ttl_seconds),
            overall_timeout: Duration::from_secs(export.overall_timeout_seconds),
            retry: RetryPolicy::from_config(export.max_upload_attempts, &export.retry),
            key_prefix: export.key_prefix.clone(),
            tenant: config.application.tenant.clone(),
            max_concurrency: export.max_concurrency,
        }
    }

    pub fn max_upload_attempts(&self) -> u32 {
        self.retry.max_attempts
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = timeout;
        self
    }

    pub fn with_default_link_ttl(mut self, ttl: Duration) -> Self {
        self.default_link_ttl = ttl;
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_link_ttl: Duration::from_secs(900),
            overall_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            key_prefix: "exports".to_string(),
            tenant: None,
            max_concurrency: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_from_config() {
        let _guard = crate::config::loader::ENV_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let config = parse_config(
            r#"
[application]
tenant = "acme"

[storage]
backend = "memory"

[export]
default_link_ttl_seconds = 300
max_upload_attempts = 5
overall_timeout_seconds = 20
"#,
        )
        .unwrap();

        let settings = ExportSettings::from_config(&config);
        assert_eq!(settings.default_link_ttl, Duration::from_secs(300));
        assert_eq!(settings.overall_timeout, Duration::from_secs(20));
        assert_eq!(settings.max_upload_attempts(), 5);
        assert_eq!(settings.tenant.as_deref(), Some("acme"));
        assert_eq!(settings.key_prefix, "exports");
    }

    #[test]
    fn test_defaults_match_config_defaults() {
        let settings = ExportSettings::default();
        assert_eq!(settings.max_upload_attempts(), 3);
        assert_eq!(settings.default_link_ttl, Duration::from_secs(900));
    }
}

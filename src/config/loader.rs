//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DocshipConfig, Environment, StorageBackend};
use super::secret::secret_string;
use crate::domain::errors::DocshipError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Prefix for environment overrides (`DOCSHIP_<SECTION>_<KEY>`)
pub const ENV_PREFIX: &str = "DOCSHIP";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`DocshipConfig`]
/// 4. Applies environment variable overrides (`DOCSHIP_*` prefix)
/// 5. Validates the configuration
///
/// # Examples
///
/// ```no_run
/// use docship::config::load_config;
///
/// let config = load_config("docship.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DocshipConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DocshipError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DocshipError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses and validates configuration from TOML text
///
/// Runs the same substitution, override and validation steps as
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<DocshipConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DocshipConfig = toml::from_str(&contents)
        .map_err(|e| DocshipError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        DocshipError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. Every missing variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|m| m == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(DocshipError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn env_parse<T>(section: &str, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(section, key) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|e| {
            DocshipError::Configuration(format!(
                "Invalid value '{raw}' for {ENV_PREFIX}_{section}_{key}: {e}"
            ))
        }),
        None => Ok(None),
    }
}

fn parse_environment(raw: &str) -> Result<Environment> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "development" => Ok(Environment::Development),
        "staging" => Ok(Environment::Staging),
        "production" => Ok(Environment::Production),
        other => Err(DocshipError::Configuration(format!(
            "Invalid environment '{other}'. Must be one of: development, staging, production"
        ))),
    }
}

fn parse_backend(raw: &str) -> Result<StorageBackend> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "http" => Ok(StorageBackend::Http),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(DocshipError::Configuration(format!(
            "Invalid storage backend '{other}'. Must be one of: http, memory"
        ))),
    }
}

/// Applies environment variable overrides using the `DOCSHIP_*` prefix
///
/// Environment variables follow the pattern `DOCSHIP_<SECTION>_<KEY>`, for
/// example `DOCSHIP_STORAGE_ENDPOINT` or `DOCSHIP_EXPORT_DEFAULT_LINK_TTL_SECONDS`.
fn apply_env_overrides(config: &mut DocshipConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_var("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_var("APPLICATION", "ENVIRONMENT") {
        config.application.environment = parse_environment(&val)?;
    }
    if let Some(val) = env_var("APPLICATION", "TENANT") {
        config.application.tenant = Some(val).filter(|t| !t.is_empty());
    }

    // Storage overrides
    if let Some(val) = env_var("STORAGE", "BACKEND") {
        config.storage.backend = parse_backend(&val)?;
    }
    if let Some(val) = env_var("STORAGE", "ENDPOINT") {
        config.storage.endpoint = val;
    }
    if let Some(val) = env_var("STORAGE", "BUCKET") {
        config.storage.bucket = val;
    }
    if let Some(val) = env_var("STORAGE", "CREDENTIALS") {
        config.storage.credentials = Some(secret_string(val));
    }
    if let Some(val) = env_var("STORAGE", "SIGNING_KEY") {
        config.storage.signing_key = Some(secret_string(val));
    }
    if let Some(val) = env_var("STORAGE", "PUBLIC_BASE_URL") {
        config.storage.public_base_url = Some(val);
    }
    if let Some(val) = env_parse("STORAGE", "TLS_VERIFY")? {
        config.storage.tls_verify = val;
    }
    if let Some(val) = env_parse("STORAGE", "REQUEST_TIMEOUT_SECONDS")? {
        config.storage.request_timeout_seconds = val;
    }
    if let Some(val) = env_parse("STORAGE", "MAX_PAYLOAD_BYTES")? {
        config.storage.max_payload_bytes = val;
    }

    // Export overrides
    if let Some(val) = env_parse("EXPORT", "DEFAULT_LINK_TTL_SECONDS")? {
        config.export.default_link_ttl_seconds = val;
    }
    if let Some(val) = env_parse("EXPORT", "MAX_UPLOAD_ATTEMPTS")? {
        config.export.max_upload_attempts = val;
    }
    if let Some(val) = env_parse("EXPORT", "OVERALL_TIMEOUT_SECONDS")? {
        config.export.overall_timeout_seconds = val;
    }
    if let Some(val) = env_var("EXPORT", "KEY_PREFIX") {
        config.export.key_prefix = val;
    }
    if let Some(val) = env_parse("EXPORT", "MAX_CONCURRENCY")? {
        config.export.max_concurrency = val;
    }

    // Records, server and logging overrides
    if let Some(val) = env_var("RECORDS", "PATH") {
        config.records.path = val;
    }
    if let Some(val) = env_var("SERVER", "BIND_ADDRESS") {
        config.server.bind_address = val;
    }
    if let Some(val) = env_parse("LOGGING", "LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_var("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Serializes tests that read or mutate `DOCSHIP_*` environment variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

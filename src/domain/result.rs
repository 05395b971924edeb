//! Result type alias for docship
//!
//! This module provides a convenient Result type alias that uses DocshipError
//! as the error type.

use super::errors::DocshipError;

/// Result type alias for docship operations
///
/// Pipeline stages return their own error types; this alias is for
/// configuration, adapters and host surfaces.
///
/// # Examples
///
/// ```
/// use docship::domain::result::Result;
/// use docship::domain::errors::DocshipError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DocshipError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DocshipError>;

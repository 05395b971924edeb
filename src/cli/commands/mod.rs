//! CLI command implementations
//!
//! Exit codes: 0 success, 1 export failed, 2 configuration error,
//! 4 connection error, 5 fatal error.

pub mod export;
pub mod health;
pub mod init;
pub mod serve;
pub mod validate;

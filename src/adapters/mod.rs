//! External system integrations for docship.
//!
//! - [`records`] - Where log records are read from
//! - [`storage`] - Object storage capability and its implementations
//! - [`diagnostics`] - Client for a host's `/health` endpoint
//!
//! Adapters sit behind traits ([`records::RecordStore`],
//! [`storage::ObjectStore`]) so the pipeline can run against in-memory
//! implementations in tests.

pub mod diagnostics;
pub mod records;
pub mod storage;

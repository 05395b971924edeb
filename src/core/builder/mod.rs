//! Document builder
//!
//! Resolves a record, renders it onto a scratch file and reads the bytes back
//! into a [`DocumentArtifact`]. The scratch file is a [`NamedTempFile`], which
//! deletes itself when dropped, so it is gone by the time `build` returns on
//! every path. Rendering runs on the blocking pool.

pub mod renderer;

pub use renderer::{DocumentRenderer, WordMlRenderer};

use crate::adapters::records::RecordStore;
use crate::core::checksum::calculate_checksum_bytes;
use crate::domain::errors::{BuildError, RenderError};
use crate::domain::export::{DocumentArtifact, DocumentFormat, ExportRequest};
use crate::domain::ids::StorageKey;
use crate::domain::record::LogRecord;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Builds document artifacts from stored records
///
/// Holds no per-invocation state; one builder serves concurrent exports.
pub struct DocumentBuilder {
    records: Arc<dyn RecordStore>,
    renderer: Arc<dyn DocumentRenderer>,
    key_prefix: String,
    tenant: Option<String>,
    scratch_dir: Option<PathBuf>,
}

impl DocumentBuilder {
    /// Create a builder using the default Word renderer
    pub fn new(records: Arc<dyn RecordStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            records,
            renderer: Arc::new(WordMlRenderer),
            key_prefix: key_prefix.into(),
            tenant: None,
            scratch_dir: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_tenant(mut self, tenant: Option<String>) -> Self {
        self.tenant = tenant;
        self
    }

    /// Create scratch files in `dir` instead of the system temp directory
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Storage key for a request; depends only on the request and settings
    pub fn storage_key(&self, request: &ExportRequest) -> StorageKey {
        StorageKey::for_record(&self.key_prefix, self.tenant.as_deref(), request.record_id())
    }

    /// Build the artifact for `request`
    ///
    /// # Errors
    ///
    /// - [`BuildError::NotFound`] when the record does not exist
    /// - [`BuildError::Source`] when the record store cannot be read
    /// - [`BuildError::RenderFailure`] when rendering or the scratch surface fails
    pub async fn build(&self, request: &ExportRequest) -> Result<DocumentArtifact, BuildError> {
        let record_id = request.record_id();

        let record = self
            .records
            .fetch(record_id)
            .await
            .map_err(|e| BuildError::Source(e.to_string()))?
            .ok_or_else(|| BuildError::NotFound(record_id.clone()))?;

        let renderer = Arc::clone(&self.renderer);
        let scratch_dir = self.scratch_dir.clone();
        let format = request.format();
        let bytes = tokio::task::spawn_blocking(move || {
            render_to_scratch(renderer.as_ref(), &record, format, scratch_dir)
        })
        .await
        .map_err(|e| BuildError::RenderFailure(format!("render task failed: {e}")))??;

        let checksum = calculate_checksum_bytes(&bytes);
        let key = self.storage_key(request);

        tracing::debug!(
            record_id = %record_id,
            storage_key = %key,
            size = bytes.len(),
            checksum = %checksum,
            "Document built"
        );

        Ok(DocumentArtifact::new(
            record_id.clone(),
            key,
            request.format(),
            bytes,
            checksum,
        ))
    }
}

fn render_failure(err: RenderError) -> BuildError {
    BuildError::RenderFailure(err.to_string())
}

fn scratch_failure(err: std::io::Error) -> BuildError {
    BuildError::RenderFailure(format!("scratch file: {err}"))
}

fn render_to_scratch(
    renderer: &dyn DocumentRenderer,
    record: &LogRecord,
    format: DocumentFormat,
    scratch_dir: Option<PathBuf>,
) -> Result<Vec<u8>, BuildError> {
    let suffix = format!(".{}", format.extension());
    let mut builder = tempfile::Builder::new();
    builder.prefix("docship-").suffix(&suffix);
    let mut scratch: NamedTempFile = match scratch_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(scratch_failure)?;

    {
        let mut writer = BufWriter::new(scratch.as_file_mut());
        renderer.render(record, &mut writer).map_err(render_failure)?;
        writer.flush().map_err(scratch_failure)?;
    }

    let file = scratch.as_file_mut();
    file.seek(SeekFrom::Start(0)).map_err(scratch_failure)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(scratch_failure)?;

    Ok(bytes)
}

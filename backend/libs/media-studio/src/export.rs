//! Export of rendered assets
//!
//! The full render is downloaded before anything is written, so a saved file
//! is never a partially loaded preview.
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::constants::EXPORT_EXTENSION;
use crate::error::ExportError;
use crate::storage::RenderFetcher;

/// Filename for an exported render of `preset_name`.
///
/// Every run of whitespace becomes one underscore, the result is lower-cased
/// and the export extension is appended.
pub fn derive_filename(preset_name: &str) -> String {
    derive_filename_with_extension(preset_name, EXPORT_EXTENSION)
}

pub fn derive_filename_with_extension(preset_name: &str, extension: &str) -> String {
    let mut stem = String::with_capacity(preset_name.len());
    let mut in_whitespace = false;
    for ch in preset_name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(ch);
            in_whitespace = false;
        }
    }
    format!("{}.{}", stem.to_lowercase(), extension)
}

/// A file handed to the save mechanism
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Platform save-as-file mechanism
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileSink: Send + Sync {
    async fn save(&self, filename: &str, data: Bytes) -> Result<SavedFile, ExportError>;
}

/// Saves exports into a directory, creating it when missing
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn save(&self, filename: &str, data: Bytes) -> Result<SavedFile, ExportError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ExportError::SaveFailed(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| ExportError::SaveFailed(format!("cannot write {}: {e}", path.display())))?;

        Ok(SavedFile {
            filename: filename.to_string(),
            path,
            size_bytes: data.len() as u64,
        })
    }
}

/// Fetches a render and saves it under the preset-derived filename
#[derive(Clone)]
pub struct Exporter {
    fetcher: Arc<dyn RenderFetcher>,
    sink: Arc<dyn FileSink>,
}

impl Exporter {
    pub fn new(fetcher: Arc<dyn RenderFetcher>, sink: Arc<dyn FileSink>) -> Self {
        Self { fetcher, sink }
    }

    pub async fn export(&self, url: &str, preset_name: &str) -> Result<SavedFile, ExportError> {
        let filename = derive_filename(preset_name);

        let data = self.fetcher.fetch(url).await.map_err(|e| {
            warn!(url = %url, preset = preset_name, "Export fetch failed: {e}");
            e
        })?;

        let saved = self.sink.save(&filename, data).await?;
        info!(
            filename = %saved.filename,
            size = saved.size_bytes,
            "Render exported"
        );
        Ok(saved)
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Save-to-disk sinks

use crate::errors::ExportError;
use crate::storage;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for downloaded files
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Persist `data` under `filename`, returning where it ended up
    async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes downloads into a directory, never overwriting existing files
#[derive(Debug, Clone)]
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloadSink {
    async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf, ExportError> {
        let path = storage::write_unique(&self.dir, filename, data).await?;
        info!(path = %path.display(), "Download saved");
        Ok(path)
    }
}

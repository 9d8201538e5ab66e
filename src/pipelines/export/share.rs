// SPDX-License-Identifier: GPL-3.0-only

//! Native share targets
//!
//! A share target is whatever the host offers for handing a file to another
//! application. Cancellation and host refusal are reported as
//! [`ShareOutcome::Dismissed`], never as errors.

use crate::constants::naming;
use crate::errors::ExportError;
use crate::pipelines::photo::CapturedImage;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// A file-like payload offered to a share target
#[derive(Debug, Clone)]
pub struct ShareFile {
    pub name: String,
    pub mime_type: &'static str,
    pub data: Arc<[u8]>,
}

impl ShareFile {
    /// Package a capture as `photo.jpg`
    pub fn from_image(image: &CapturedImage) -> Self {
        Self {
            name: naming::SHARE_FILE_NAME.to_string(),
            mime_type: image.encoding().mime_type(),
            data: image.shared_bytes(),
        }
    }
}

/// How a share request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The host accepted the file
    Shared,
    /// The user cancelled or the host declined
    Dismissed,
}

#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether the host can share file payloads at all
    fn supports_files(&self) -> bool;

    /// Whether this particular file would be accepted
    fn can_share(&self, file: &ShareFile) -> bool;

    /// Invoke the share action
    async fn share(&self, file: ShareFile, title: &str) -> Result<ShareOutcome, ExportError>;
}

/// Host without any share facility
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedShare;

#[async_trait]
impl ShareTarget for UnsupportedShare {
    fn supports_files(&self) -> bool {
        false
    }

    fn can_share(&self, _file: &ShareFile) -> bool {
        false
    }

    async fn share(&self, _file: ShareFile, _title: &str) -> Result<ShareOutcome, ExportError> {
        Ok(ShareOutcome::Dismissed)
    }
}

/// Hands images to the desktop's default handler
///
/// The file is written into a per-request scratch directory under the system
/// temp dir and opened with the `open` crate. The handler outlives the
/// request, so the scratch file is left in place.
#[derive(Debug, Clone)]
pub struct SystemOpenShare {
    scratch_root: PathBuf,
}

impl SystemOpenShare {
    pub fn new() -> Self {
        Self {
            scratch_root: std::env::temp_dir(),
        }
    }

    pub fn with_scratch_root(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
        }
    }
}

impl Default for SystemOpenShare {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShareTarget for SystemOpenShare {
    fn supports_files(&self) -> bool {
        true
    }

    fn can_share(&self, file: &ShareFile) -> bool {
        file.mime_type.starts_with("image/") && !file.data.is_empty()
    }

    async fn share(&self, file: ShareFile, title: &str) -> Result<ShareOutcome, ExportError> {
        let dir = self
            .scratch_root
            .join(format!("mollycam-share-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ExportError::ShareFailed(e.to_string()))?;

        let path = dir.join(&file.name);
        tokio::fs::write(&path, &file.data)
            .await
            .map_err(|e| ExportError::ShareFailed(e.to_string()))?;

        info!(path = %path.display(), title, "Opening photo with system handler");

        match open::that_detached(&path) {
            Ok(()) => Ok(ShareOutcome::Shared),
            Err(e) => {
                warn!(error = %e, "System handler declined the photo");
                Ok(ShareOutcome::Dismissed)
            }
        }
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Export channel resolution
//!
//! ```text
//!  ExportRequest ──▶ resolve ──▶ ExportChannel ──▶ run ──▶ ExportReport
//!                      │
//!                      ├─ best available: native-share → file-download
//!                      ├─ native-share unusable → file-download
//!                      └─ document-export only when asked for
//! ```
//!
//! Every action reads the captured image and nothing else; the image is never
//! modified.

pub mod document;
pub mod download;
pub mod share;

pub use document::{DocumentComposer, PdfComposer, Placement};
pub use download::{DirectoryDownloadSink, DownloadSink};
pub use share::{ShareFile, ShareOutcome, ShareTarget, SystemOpenShare, UnsupportedShare};

use crate::constants::naming;
use crate::errors::ExportError;
use crate::pipelines::photo::CapturedImage;
use crate::storage::export_filename;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Supported output mechanisms, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportChannel {
    NativeShare,
    FileDownload,
    DocumentExport,
}

impl ExportChannel {
    /// The full catalog
    pub const ALL: [ExportChannel; 3] = [
        ExportChannel::NativeShare,
        ExportChannel::FileDownload,
        ExportChannel::DocumentExport,
    ];

    /// Channels considered for "best available", in priority order
    pub const AUTO: [ExportChannel; 2] = [ExportChannel::NativeShare, ExportChannel::FileDownload];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportChannel::NativeShare => "native-share",
            ExportChannel::FileDownload => "file-download",
            ExportChannel::DocumentExport => "document-export",
        }
    }

    pub fn is_auto_selectable(&self) -> bool {
        Self::AUTO.contains(self)
    }
}

impl std::fmt::Display for ExportChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native-share" | "share" => Ok(ExportChannel::NativeShare),
            "file-download" | "download" => Ok(ExportChannel::FileDownload),
            "document-export" | "document" | "pdf" => Ok(ExportChannel::DocumentExport),
            other => Err(format!("unknown export channel: {}", other)),
        }
    }
}

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportRequest {
    BestAvailable,
    Channel(ExportChannel),
}

impl std::str::FromStr for ExportRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best" | "best-available" | "auto" => Ok(ExportRequest::BestAvailable),
            other => other.parse().map(ExportRequest::Channel),
        }
    }
}

impl From<ExportChannel> for ExportRequest {
    fn from(channel: ExportChannel) -> Self {
        ExportRequest::Channel(channel)
    }
}

/// Result of a finished export action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportOutcome {
    /// The share target accepted the file
    Shared,
    /// The user cancelled the share or the host declined it
    ShareDismissed,
    /// A file was written
    Saved(PathBuf),
}

/// Record of one export, for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub requested: ExportRequest,
    pub channel: ExportChannel,
    pub outcome: ExportOutcome,
}

impl ExportReport {
    /// True when an explicitly requested channel was replaced by a lesser one
    pub fn fell_back(&self) -> bool {
        matches!(self.requested, ExportRequest::Channel(c) if c != self.channel)
    }
}

/// Decides which channel handles a request and runs it
#[derive(Clone)]
pub struct ExportResolver {
    share: Arc<dyn ShareTarget>,
    downloads: Arc<dyn DownloadSink>,
    composer: Arc<dyn DocumentComposer>,
    share_title: String,
}

impl ExportResolver {
    /// Resolver with the PDF composer
    pub fn new(share: Arc<dyn ShareTarget>, downloads: Arc<dyn DownloadSink>) -> Self {
        Self {
            share,
            downloads,
            composer: Arc::new(PdfComposer::new()),
            share_title: naming::SHARE_TITLE.to_string(),
        }
    }

    pub fn with_composer(mut self, composer: Arc<dyn DocumentComposer>) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_share_title(mut self, title: impl Into<String>) -> Self {
        self.share_title = title.into();
        self
    }

    /// Whether `channel` can run for `image` right now
    pub fn is_usable(&self, channel: ExportChannel, image: &CapturedImage) -> bool {
        match channel {
            ExportChannel::NativeShare => {
                self.share.supports_files() && self.share.can_share(&ShareFile::from_image(image))
            }
            ExportChannel::FileDownload | ExportChannel::DocumentExport => true,
        }
    }

    /// Usable channels in catalog order
    pub fn usable_channels(&self, image: &CapturedImage) -> Vec<ExportChannel> {
        ExportChannel::ALL
            .into_iter()
            .filter(|channel| self.is_usable(*channel, image))
            .collect()
    }

    /// Pick the channel that will actually run
    pub fn resolve(&self, request: ExportRequest, image: &CapturedImage) -> ExportChannel {
        match request {
            ExportRequest::BestAvailable => ExportChannel::AUTO
                .into_iter()
                .find(|channel| self.is_usable(*channel, image))
                .unwrap_or(ExportChannel::FileDownload),
            ExportRequest::Channel(ExportChannel::NativeShare)
                if !self.is_usable(ExportChannel::NativeShare, image) =>
            {
                info!("Sharing unsupported for this image, falling back to download");
                ExportChannel::FileDownload
            }
            ExportRequest::Channel(channel) => channel,
        }
    }

    /// Resolve and run in one step
    pub async fn export(
        &self,
        request: ExportRequest,
        image: &CapturedImage,
    ) -> Result<ExportReport, ExportError> {
        let channel = self.resolve(request, image);
        self.run(request, channel, image).await
    }

    /// Run an already resolved channel
    ///
    /// A channel that is not usable for `image` is resolved again from
    /// `request`, so an unshareable image never reaches the share target.
    pub(crate) async fn run(
        &self,
        request: ExportRequest,
        channel: ExportChannel,
        image: &CapturedImage,
    ) -> Result<ExportReport, ExportError> {
        let channel = if self.is_usable(channel, image) {
            channel
        } else {
            warn!(channel = %channel, "Channel not usable, resolving again");
            self.resolve(request, image)
        };
        info!(channel = %channel, "Exporting photo");

        let outcome = match channel {
            ExportChannel::NativeShare => self.share_image(image).await?,
            ExportChannel::FileDownload => self.download_image(image).await?,
            ExportChannel::DocumentExport => self.export_document(image).await?,
        };

        Ok(ExportReport {
            requested: request,
            channel,
            outcome,
        })
    }

    async fn share_image(&self, image: &CapturedImage) -> Result<ExportOutcome, ExportError> {
        let file = ShareFile::from_image(image);
        match self.share.share(file, &self.share_title).await? {
            ShareOutcome::Shared => Ok(ExportOutcome::Shared),
            ShareOutcome::Dismissed => {
                info!("Share dismissed");
                Ok(ExportOutcome::ShareDismissed)
            }
        }
    }

    async fn download_image(&self, image: &CapturedImage) -> Result<ExportOutcome, ExportError> {
        let filename = export_filename(&image.taken_at(), image.encoding().extension());
        // The copy handed to the sink lives only for this call
        let payload = image.shared_bytes();
        let path = self.downloads.save(&filename, &payload).await?;
        drop(payload);
        Ok(ExportOutcome::Saved(path))
    }

    async fn export_document(&self, image: &CapturedImage) -> Result<ExportOutcome, ExportError> {
        let composer = Arc::clone(&self.composer);
        let source = image.clone();
        let document = tokio::task::spawn_blocking(move || composer.compose(&source))
            .await
            .map_err(|e| ExportError::DocumentFailed(format!("Document task error: {}", e)))?
            .inspect_err(|e| warn!(error = %e, "Document composition failed"))?;

        let filename = export_filename(&image.taken_at(), naming::PDF_EXTENSION);
        let path = self.downloads.save(&filename, &document).await?;
        Ok(ExportOutcome::Saved(path))
    }
}

impl std::fmt::Debug for ExportResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportResolver")
            .field("share_supports_files", &self.share.supports_files())
            .field("share_title", &self.share_title)
            .finish()
    }
}

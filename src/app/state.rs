// SPDX-License-Identifier: GPL-3.0-only

//! Session state management

use crate::backends::camera::Facing;
use crate::errors::SessionError;
use crate::pipelines::export::{ExportChannel, ExportReport, ExportRequest};
use crate::pipelines::photo::CapturedImage;
use serde::Serialize;

/// Public view of the session mode
///
/// Exactly one is active at a time. A captured image exists only in
/// `Captured` and `Exporting`; a live stream exists only in `Streaming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case", tag = "state", content = "detail")]
pub enum SessionState {
    #[default]
    Idle,
    Streaming(Facing),
    Captured,
    Exporting(ExportChannel),
}

impl SessionState {
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionState::Streaming(_))
    }

    /// Whether this state carries a captured image
    pub fn holds_image(&self) -> bool {
        matches!(self, SessionState::Captured | SessionState::Exporting(_))
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Streaming(facing) => write!(f, "streaming ({})", facing),
            SessionState::Captured => write!(f, "captured"),
            SessionState::Exporting(channel) => write!(f, "exporting ({})", channel),
        }
    }
}

/// Internal mode, carrying the captured image where one exists
#[derive(Debug, Clone, Default)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Streaming(Facing),
    Captured(CapturedImage),
    Exporting(ExportChannel, CapturedImage),
}

impl Phase {
    pub(crate) fn state(&self) -> SessionState {
        match self {
            Phase::Idle => SessionState::Idle,
            Phase::Streaming(facing) => SessionState::Streaming(*facing),
            Phase::Captured(_) => SessionState::Captured,
            Phase::Exporting(channel, _) => SessionState::Exporting(*channel),
        }
    }

    pub(crate) fn image(&self) -> Option<&CapturedImage> {
        match self {
            Phase::Captured(image) | Phase::Exporting(_, image) => Some(image),
            Phase::Idle | Phase::Streaming(_) => None,
        }
    }
}

/// User intents forwarded by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start (or retry starting) the camera
    Start,
    /// Take the photo
    Capture,
    /// Switch between front and rear camera
    FlipCamera,
    /// Discard the photo and go back to the camera
    Retake,
    /// Export the photo
    ExportVia(ExportRequest),
}

/// Everything the presentation layer needs to render
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub state: SessionState,
    /// Handle to the captured image for preview
    pub preview: Option<CapturedImage>,
    pub has_live_stream: bool,
    pub last_error: Option<SessionError>,
    pub last_export: Option<ExportReport>,
}

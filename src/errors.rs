// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture-and-export pipeline
//!
//! [`SessionError`] is what the presentation layer sees. Component-level
//! errors ([`PhotoError`], [`ExportError`], and
//! [`BackendError`](crate::backends::camera::BackendError)) convert into it.

use crate::backends::camera::BackendError;
use std::fmt;

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors surfaced by the capture session
///
/// None of these end the session; the captured image, once created, survives
/// every error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No camera, permission denied, or constraints unsatisfiable
    DeviceUnavailable(String),
    /// The stream had no usable frame
    CaptureFailed(String),
    /// Document assembly or saving failed
    ExportFailed(String),
    /// Intent rejected while an export is in flight
    Busy,
    /// The session driver has shut down
    Closed,
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Stream is not live
    StreamNotLive,
    /// No frame delivered yet
    NoFrameAvailable,
    /// Frame geometry or buffer size is invalid
    InvalidFrame(String),
    /// Encoding failed
    EncodingFailed(String),
}

/// Export action errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Handing the file to the share target failed outright
    ShareFailed(String),
    /// Writing the file failed
    SaveFailed(String),
    /// Rasterization or document assembly failed
    DocumentFailed(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            SessionError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            SessionError::ExportFailed(msg) => write!(f, "Export failed: {}", msg),
            SessionError::Busy => write!(f, "An export is still in progress"),
            SessionError::Closed => write!(f, "Session closed"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::StreamNotLive => write!(f, "Stream is not live"),
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::InvalidFrame(msg) => write!(f, "Invalid frame: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::ShareFailed(msg) => write!(f, "Share failed: {}", msg),
            ExportError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
            ExportError::DocumentFailed(msg) => write!(f, "Document export failed: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for ExportError {}

impl From<BackendError> for SessionError {
    fn from(err: BackendError) -> Self {
        SessionError::DeviceUnavailable(err.to_string())
    }
}

impl From<PhotoError> for SessionError {
    fn from(err: PhotoError) -> Self {
        SessionError::CaptureFailed(err.to_string())
    }
}

impl From<ExportError> for SessionError {
    fn from(err: ExportError) -> Self {
        SessionError::ExportFailed(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        PhotoError::EncodingFailed(err.to_string())
    }
}

impl From<lopdf::Error> for ExportError {
    fn from(err: lopdf::Error) -> Self {
        ExportError::DocumentFailed(err.to_string())
    }
}

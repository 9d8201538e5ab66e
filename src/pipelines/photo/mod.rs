// SPDX-License-Identifier: GPL-3.0-only

//! Still photo capture pipeline
//!
//! ```text
//! Live stream → latest frame → RGB at native size → JPEG → CapturedImage
//! ```
//!
//! The captured image is immutable. Exports only ever read it.

pub mod capture;
pub mod encoding;

pub use capture::FrameCapture;
pub use encoding::PhotoEncoder;

use crate::constants::{mime, naming};
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Declared encoding of a captured image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg,
}

impl ImageEncoding {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Jpeg => naming::JPEG_EXTENSION,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageEncoding::Jpeg => mime::JPEG,
        }
    }
}

/// The single in-memory still produced by a capture event
///
/// Cloning is cheap; the encoded bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data: Arc<[u8]>,
    encoding: ImageEncoding,
    width: u32,
    height: u32,
    taken_at: DateTime<Local>,
}

impl CapturedImage {
    pub fn new(
        data: impl Into<Arc<[u8]>>,
        encoding: ImageEncoding,
        width: u32,
        height: u32,
        taken_at: DateTime<Local>,
    ) -> Self {
        Self {
            data: data.into(),
            encoding,
            width,
            height,
            taken_at,
        }
    }

    /// Encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the encoded bytes
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Local moment the frame was captured
    pub fn taken_at(&self) -> DateTime<Local> {
        self.taken_at
    }
}

impl std::fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("encoding", &self.encoding)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .field("taken_at", &self.taken_at)
            .finish()
    }
}

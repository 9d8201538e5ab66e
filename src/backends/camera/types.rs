// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Which physical camera is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// User-facing camera (selfie)
    #[default]
    Front,
    /// Environment-facing camera
    Rear,
}

impl Facing {
    /// The other camera
    pub fn opposite(self) -> Self {
        match self {
            Facing::Front => Facing::Rear,
            Facing::Rear => Facing::Front,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Rear => "rear",
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" | "user" => Ok(Facing::Front),
            "rear" | "back" | "environment" => Ok(Facing::Rear),
            other => Err(format!("unknown facing direction: {}", other)),
        }
    }
}

/// Constraints passed to the device layer when requesting a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    /// Preferred width; the device may deliver a different size
    pub preferred_width: u32,
    /// Preferred height; the device may deliver a different size
    pub preferred_height: u32,
}

/// Pixel format of frame data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    Rgba,
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    Rgb24,
    /// YUYV - Packed 4:2:2 (Y0 U Y1 V interleaved)
    /// Common raw format from webcam sensors
    Yuyv,
}

impl PixelFormat {
    /// Bytes needed for one row of `width` pixels (without padding)
    pub fn row_bytes(&self, width: u32) -> usize {
        let width = width as usize;
        match self {
            PixelFormat::Rgba => width * 4,
            PixelFormat::Rgb24 => width * 3,
            PixelFormat::Yuyv => width.div_ceil(2) * 4,
        }
    }
}

/// A single frame as delivered to the display sink
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a tightly packed frame (stride == row bytes)
    pub fn packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: format.row_bytes(width) as u32,
            data: Arc::from(data),
            format,
            captured_at: Instant::now(),
        }
    }

    /// True when the frame has a positive size and enough bytes for it
    pub fn is_complete(&self) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let row = self.format.row_bytes(self.width);
        let stride = self.stride as usize;
        if stride < row {
            return false;
        }
        let needed = stride * (self.height as usize - 1) + row;
        self.data.len() >= needed
    }
}

/// Latest frame slot shared between a device and its consumers
pub type FrameSender = watch::Sender<Option<Arc<CameraFrame>>>;

/// Receiver side of the latest frame slot; used as the preview sink
pub type FrameReceiver = watch::Receiver<Option<Arc<CameraFrame>>>;

/// A stream as handed out by a device implementation
#[derive(Debug, Clone)]
pub struct LiveStream {
    /// Device-assigned identifier, unique per request
    pub id: u64,
    pub facing: Facing,
    /// Most recent frame; `None` until the first frame arrives
    pub frames: FrameReceiver,
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// User or system refused camera access
    PermissionDenied(String),
    /// No mode satisfies the requested constraints
    FormatNotSupported(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => BackendError::DeviceNotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => BackendError::PermissionDenied(err.to_string()),
            _ => BackendError::IoError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_opposite() {
        assert_eq!(Facing::Front.opposite(), Facing::Rear);
        assert_eq!(Facing::Rear.opposite(), Facing::Front);
    }

    #[test]
    fn test_facing_parse() {
        assert_eq!("front".parse::<Facing>(), Ok(Facing::Front));
        assert_eq!("Back".parse::<Facing>(), Ok(Facing::Rear));
        assert!("sideways".parse::<Facing>().is_err());
    }

    #[test]
    fn test_frame_completeness() {
        let frame = CameraFrame::packed(4, 2, PixelFormat::Rgba, vec![0; 32]);
        assert!(frame.is_complete());

        let short = CameraFrame::packed(4, 2, PixelFormat::Rgba, vec![0; 31]);
        assert!(!short.is_complete());

        let empty = CameraFrame::packed(0, 0, PixelFormat::Rgba, Vec::new());
        assert!(!empty.is_complete());
    }

    #[test]
    fn test_yuyv_row_bytes_odd_width() {
        assert_eq!(PixelFormat::Yuyv.row_bytes(3), 8);
        assert_eq!(PixelFormat::Yuyv.row_bytes(4), 8);
    }
}

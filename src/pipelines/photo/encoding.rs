// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of captured frames
//!
//! Frames are encoded at their native resolution. Quality and encoder are
//! fixed per encoder instance, so the same pixels always produce the same
//! bytes.

use crate::backends::camera::CameraFrame;
use crate::backends::camera::format_converters::frame_to_rgb;
use crate::constants::{JPEG_QUALITY, MIN_JPEG_QUALITY};
use crate::errors::PhotoError;
use tracing::debug;

/// Photo encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Create an encoder; quality is clamped to 90..=100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(MIN_JPEG_QUALITY, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a frame as JPEG
    pub fn encode_jpeg(&self, frame: &CameraFrame) -> Result<Vec<u8>, PhotoError> {
        let rgb = frame_to_rgb(frame).ok_or_else(|| {
            PhotoError::InvalidFrame(format!(
                "{}x{} {:?} frame with stride {} has only {} bytes",
                frame.width,
                frame.height,
                frame.format,
                frame.stride,
                frame.data.len()
            ))
        })?;

        let mut buffer = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, self.quality);
        encoder.encode(
            &rgb,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )?;

        debug!(
            width = frame.width,
            height = frame.height,
            size = buffer.len(),
            quality = self.quality,
            "JPEG encoding complete"
        );

        Ok(buffer)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new(JPEG_QUALITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::PixelFormat;

    #[test]
    fn test_quality_clamped() {
        assert_eq!(PhotoEncoder::new(10).quality(), MIN_JPEG_QUALITY);
        assert_eq!(PhotoEncoder::new(250).quality(), 100);
        assert_eq!(PhotoEncoder::default().quality(), JPEG_QUALITY);
    }

    #[test]
    fn test_encodes_valid_jpeg() {
        let frame = CameraFrame::packed(8, 4, PixelFormat::Rgb24, vec![200; 8 * 4 * 3]);
        let jpeg = PhotoEncoder::default().encode_jpeg(&frame).unwrap();

        // SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn test_rejects_truncated_frame() {
        let frame = CameraFrame::packed(8, 4, PixelFormat::Rgba, vec![0; 10]);
        let result = PhotoEncoder::default().encode_jpeg(&frame);
        assert!(matches!(result, Err(PhotoError::InvalidFrame(_))));
    }
}

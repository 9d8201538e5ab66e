// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture from a live stream
//!
//! Reads the frame currently shown by the display sink and encodes it on a
//! blocking worker so the runtime keeps servicing other work.

use super::encoding::PhotoEncoder;
use super::{CapturedImage, ImageEncoding};
use crate::backends::camera::{CameraFrame, StreamHandle};
use crate::errors::PhotoError;
use chrono::{DateTime, Local};
use tracing::{debug, info};

/// Snapshots a single frame into a [`CapturedImage`]
#[derive(Debug, Clone, Default)]
pub struct FrameCapture {
    encoder: PhotoEncoder,
}

impl FrameCapture {
    pub fn new(encoder: PhotoEncoder) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &PhotoEncoder {
        &self.encoder
    }

    /// Capture the current frame of `handle`
    ///
    /// # Returns
    /// * `Ok(CapturedImage)` - JPEG at the frame's native size
    /// * `Err(PhotoError)` - Stream not live, no frame yet, or a malformed frame
    pub async fn capture(&self, handle: &StreamHandle) -> Result<CapturedImage, PhotoError> {
        if !handle.is_live() {
            return Err(PhotoError::StreamNotLive);
        }

        let frame = handle.latest_frame().ok_or(PhotoError::NoFrameAvailable)?;
        if frame.width == 0 || frame.height == 0 {
            return Err(PhotoError::NoFrameAvailable);
        }

        let taken_at = Local::now();
        info!(
            width = frame.width,
            height = frame.height,
            format = ?frame.format,
            facing = %handle.facing(),
            "Capturing photo"
        );

        let encoder = self.encoder;
        let image = tokio::task::spawn_blocking(move || encode_frame(encoder, &frame, taken_at))
            .await
            .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))??;

        debug!(size = image.bytes().len(), "Photo captured");
        Ok(image)
    }

    /// Encode a frame that is already at hand, stamped with the current time
    pub fn capture_frame(&self, frame: &CameraFrame) -> Result<CapturedImage, PhotoError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(PhotoError::NoFrameAvailable);
        }
        encode_frame(self.encoder, frame, Local::now())
    }
}

fn encode_frame(
    encoder: PhotoEncoder,
    frame: &CameraFrame,
    taken_at: DateTime<Local>,
) -> Result<CapturedImage, PhotoError> {
    let data = encoder.encode_jpeg(frame)?;
    Ok(CapturedImage::new(
        data,
        ImageEncoding::Jpeg,
        frame.width,
        frame.height,
        taken_at,
    ))
}

// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera sources
//!
//! These devices need no hardware: [`TestPatternDevice`] renders a synthetic
//! frame per facing direction and [`ImageFileDevice`] serves still images from
//! disk. Both publish a single frame as soon as a stream starts, which is all
//! the capture pipeline needs.

mod file_source;

pub use file_source::{ImageFileDevice, load_image_as_frame};

use crate::backends::camera::{
    BackendError, BackendResult, CameraFrame, Facing, LiveStream, MediaDevice, PixelFormat,
    StreamConstraints,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

/// Bookkeeping shared by the virtual devices
#[derive(Debug, Default)]
struct StreamRegistry {
    next_id: AtomicU64,
    live: Mutex<HashSet<u64>>,
}

impl StreamRegistry {
    fn open(&self, facing: Facing, frame: CameraFrame) -> LiveStream {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(id);

        // The stream keeps the frame after the sender is gone
        let (_sender, frames) = watch::channel(Some(Arc::new(frame)));

        debug!(stream_id = id, facing = %facing, "Virtual stream opened");
        LiveStream { id, facing, frames }
    }

    fn close(&self, id: u64) {
        if self.live.lock().unwrap().remove(&id) {
            debug!(stream_id = id, "Virtual stream closed");
        }
    }

    fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }
}

/// Synthetic camera producing a deterministic gradient
///
/// The front camera renders a horizontal gradient, the rear camera a vertical
/// one, so captures from each side are distinguishable.
#[derive(Debug)]
pub struct TestPatternDevice {
    width: Option<u32>,
    height: Option<u32>,
    rear_available: bool,
    streams: StreamRegistry,
}

impl TestPatternDevice {
    /// Frames follow the requested preferred resolution
    pub fn new() -> Self {
        Self {
            width: None,
            height: None,
            rear_available: true,
            streams: StreamRegistry::default(),
        }
    }

    /// Always render at a fixed resolution, ignoring the preferred size
    pub fn with_resolution(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::new()
        }
    }

    /// Simulate hardware with only a front camera
    pub fn front_only(mut self) -> Self {
        self.rear_available = false;
        self
    }

    /// Number of streams that were requested but not yet stopped
    pub fn live_streams(&self) -> usize {
        self.streams.live_count()
    }

    /// Render the pattern for `facing` at the given size
    pub fn render(facing: Facing, width: u32, height: u32) -> CameraFrame {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let (along, across) = match facing {
                    Facing::Front => (x, y),
                    Facing::Rear => (y, x),
                };
                let extent = match facing {
                    Facing::Front => width,
                    Facing::Rear => height,
                };
                let level = (along * 255 / extent.max(1)) as u8;
                let stripe = if (across / 16) % 2 == 0 { 32 } else { 96 };
                data.extend_from_slice(&[level, stripe, 255 - level, 255]);
            }
        }
        CameraFrame::packed(width, height, PixelFormat::Rgba, data)
    }
}

impl Default for TestPatternDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDevice for TestPatternDevice {
    fn name(&self) -> &str {
        "test-pattern"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn request_stream(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream> {
        if constraints.facing == Facing::Rear && !self.rear_available {
            return Err(BackendError::DeviceNotFound("No rear camera".into()));
        }

        let width = self.width.unwrap_or(constraints.preferred_width);
        let height = self.height.unwrap_or(constraints.preferred_height);
        if width == 0 || height == 0 {
            return Err(BackendError::FormatNotSupported(format!(
                "{}x{} is not a valid frame size",
                width, height
            )));
        }

        let frame = Self::render(constraints.facing, width, height);
        Ok(self.streams.open(constraints.facing, frame))
    }

    fn stop_stream(&self, stream: &LiveStream) {
        self.streams.close(stream.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraints(facing: Facing) -> StreamConstraints {
        StreamConstraints {
            facing,
            preferred_width: 64,
            preferred_height: 48,
        }
    }

    #[tokio::test]
    async fn test_stream_has_frame_at_preferred_size() {
        let device = TestPatternDevice::new();
        let stream = device.request_stream(&constraints(Facing::Front)).await.unwrap();

        let frame = stream.frames.borrow().clone().unwrap();
        assert_eq!((frame.width, frame.height), (64, 48));
        assert!(frame.is_complete());
        assert_eq!(device.live_streams(), 1);

        device.stop_stream(&stream);
        device.stop_stream(&stream);
        assert_eq!(device.live_streams(), 0);
    }

    #[tokio::test]
    async fn test_front_only_refuses_rear() {
        let device = TestPatternDevice::new().front_only();
        let result = device.request_stream(&constraints(Facing::Rear)).await;
        assert!(matches!(result, Err(BackendError::DeviceNotFound(_))));
    }

    #[test]
    fn test_patterns_differ_per_facing() {
        let front = TestPatternDevice::render(Facing::Front, 32, 32);
        let rear = TestPatternDevice::render(Facing::Rear, 32, 32);
        assert_ne!(front.data, rear.data);
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Camera stream lifecycle manager
//!
//! The manager provides:
//! - Acquisition of a live stream for a facing direction
//! - Idempotent release, including on drop
//! - At most one live stream at any time

use super::MediaDevice;
use super::types::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The single live stream owned by a [`DeviceStreamManager`]
///
/// Handles never leave the manager by value; callers borrow them through
/// [`DeviceStreamManager::active`].
#[derive(Debug)]
pub struct StreamHandle {
    stream: LiveStream,
    live: bool,
}

impl StreamHandle {
    pub fn facing(&self) -> Facing {
        self.stream.facing
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Most recent frame delivered to the display sink
    pub fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        self.stream.frames.borrow().clone()
    }

    /// A receiver the presentation layer can render from
    pub fn preview(&self) -> FrameReceiver {
        self.stream.frames.clone()
    }

    fn stop(&mut self, device: &dyn MediaDevice) {
        if !self.live {
            return;
        }
        device.stop_stream(&self.stream);
        self.live = false;
    }
}

/// Acquires and releases live video sources
pub struct DeviceStreamManager {
    device: Arc<dyn MediaDevice>,
    preferred_width: u32,
    preferred_height: u32,
    active: Option<StreamHandle>,
}

impl DeviceStreamManager {
    /// Create a new stream manager
    ///
    /// # Arguments
    /// * `device` - Device subsystem to request streams from
    /// * `preferred_width`, `preferred_height` - Resolution hint sent with every request
    pub fn new(device: Arc<dyn MediaDevice>, preferred_width: u32, preferred_height: u32) -> Self {
        info!(device = device.name(), "Creating device stream manager");

        Self {
            device,
            preferred_width,
            preferred_height,
            active: None,
        }
    }

    /// Check if the underlying device can deliver streams
    pub fn is_available(&self) -> bool {
        self.device.is_available()
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    /// Acquire a stream for `facing`
    ///
    /// Any previously held stream is fully released before the new request is
    /// made, so two live handles never coexist.
    pub async fn acquire(&mut self, facing: Facing) -> BackendResult<&StreamHandle> {
        self.release();

        let constraints = StreamConstraints {
            facing,
            preferred_width: self.preferred_width,
            preferred_height: self.preferred_height,
        };

        info!(
            facing = %facing,
            width = constraints.preferred_width,
            height = constraints.preferred_height,
            "Requesting camera stream"
        );

        let stream = match self.device.request_stream(&constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(facing = %facing, error = %e, "Camera stream request failed");
                return Err(e);
            }
        };

        debug!(stream_id = stream.id, "Camera stream started");

        let handle: &StreamHandle = self.active.insert(StreamHandle { stream, live: true });
        Ok(handle)
    }

    /// Stop the active stream, if any
    ///
    /// Calling this with nothing held, or twice in a row, does nothing.
    pub fn release(&mut self) {
        if let Some(mut handle) = self.active.take() {
            info!(facing = %handle.facing(), "Releasing camera stream");
            handle.stop(self.device.as_ref());
        }
    }

    /// The live stream, if one is held
    pub fn active(&self) -> Option<&StreamHandle> {
        self.active.as_ref().filter(|handle| handle.is_live())
    }

    pub fn has_live_stream(&self) -> bool {
        self.active().is_some()
    }
}

impl Drop for DeviceStreamManager {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for DeviceStreamManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStreamManager")
            .field("device", &self.device.name())
            .field("active", &self.active.as_ref().map(|h| h.facing()))
            .finish()
    }
}

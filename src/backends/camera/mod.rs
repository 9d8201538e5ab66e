// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │    CaptureSession    │
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │ DeviceStreamManager  │  ← Owns the single live stream handle
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐
//! │  MediaDevice trait   │  ← request / stop stream
//! └──────────┬───────────┘
//!            │
//!      ┌─────┴──────┬─────────────┐
//!      ▼            ▼             ▼
//!  ┌───────┐  ┌───────────┐  ┌──────────┐
//!  │ V4L2  │  │TestPattern│  │ImageFile │
//!  └───────┘  └───────────┘  └──────────┘
//! ```

pub mod format_converters;
pub mod manager;
pub mod types;
#[cfg(target_os = "linux")]
pub mod v4l2;

pub use manager::{DeviceStreamManager, StreamHandle};
pub use types::*;

use async_trait::async_trait;

/// Device/media subsystem as seen by the capture pipeline
///
/// Implementations start delivering frames into [`LiveStream::frames`] as soon
/// as `request_stream` returns, and stop once `stop_stream` is called.
#[async_trait]
pub trait MediaDevice: Send + Sync {
    /// Human readable backend name for logs
    fn name(&self) -> &str;

    /// Check if this backend can deliver any stream at all
    fn is_available(&self) -> bool;

    /// Request a video source matching the constraints
    ///
    /// # Returns
    /// * `Ok(LiveStream)` - Stream started
    /// * `Err(BackendError)` - No camera, permission denied or constraints unsatisfiable
    async fn request_stream(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream>;

    /// Stop every track of the stream
    fn stop_stream(&self, stream: &LiveStream);
}

// SPDX-License-Identifier: GPL-3.0-only

//! Capture session
//!
//! The session is the orchestrator of the pipeline. It owns the current mode,
//! mediates user intents, drives the stream manager and frame capture, and
//! holds the captured image until retake.
//!
//! # Architecture
//!
//! - `state`: Session state types (SessionState, Intent, Snapshot)
//! - `update`: Intent dispatch
//! - `handlers`: Intent handlers grouped by domain (camera, capture, export)
//! - `driver`: Task that owns a session and serializes intents
//!
//! # Transitions
//!
//! ```text
//!            start                 capture
//!   Idle ───────────▶ Streaming ───────────▶ Captured ◀──┐
//!    ▲   ◀─ fail ──── │   ▲  flip              │         │ done / dismissed / failed
//!    │                └───┘                    ▼         │
//!    │                  ▲ retake          Exporting ─────┘
//!    └── fail ──────────┴───────────────── Captured
//! ```

mod driver;
mod handlers;
mod state;
mod update;

pub use driver::SessionDriver;
pub use state::{Intent, SessionState, Snapshot};

use crate::backends::camera::{DeviceStreamManager, Facing, FrameReceiver, MediaDevice};
use crate::config::Config;
use crate::errors::{SessionError, SessionResult};
use crate::pipelines::export::{ExportReport, ExportResolver};
use crate::pipelines::photo::{CapturedImage, FrameCapture, PhotoEncoder};
use state::Phase;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// The capture-and-export state machine
pub struct CaptureSession {
    streams: DeviceStreamManager,
    capture: FrameCapture,
    exporter: ExportResolver,
    phase: Phase,
    /// Most recently used facing direction
    facing: Facing,
    last_error: Option<SessionError>,
    last_export: Option<ExportReport>,
    snapshots: watch::Sender<Snapshot>,
}

impl CaptureSession {
    /// Create an idle session; call [`start`](Self::start) to open the camera
    pub fn new(device: Arc<dyn MediaDevice>, exporter: ExportResolver, config: &Config) -> Self {
        let streams =
            DeviceStreamManager::new(device, config.preferred_width, config.preferred_height);
        let capture = FrameCapture::new(PhotoEncoder::new(config.jpeg_quality()));
        let (snapshots, _) = watch::channel(Snapshot::default());

        info!(
            device = streams.device_name(),
            facing = %config.initial_facing,
            "Creating capture session"
        );

        Self {
            streams,
            capture,
            exporter,
            phase: Phase::Idle,
            facing: config.initial_facing,
            last_error: None,
            last_export: None,
            snapshots,
        }
    }

    pub fn state(&self) -> SessionState {
        self.phase.state()
    }

    pub fn captured_image(&self) -> Option<&CapturedImage> {
        self.phase.image()
    }

    pub fn has_live_stream(&self) -> bool {
        self.streams.has_live_stream()
    }

    /// Facing direction used by the next start or retake
    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn last_export(&self) -> Option<&ExportReport> {
        self.last_export.as_ref()
    }

    pub fn exporter(&self) -> &ExportResolver {
        &self.exporter
    }

    /// Live frames for the viewfinder, while streaming
    pub fn live_preview(&self) -> Option<FrameReceiver> {
        self.streams.active().map(|handle| handle.preview())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state(),
            preview: self.captured_image().cloned(),
            has_live_stream: self.has_live_stream(),
            last_error: self.last_error.clone(),
            last_export: self.last_export.clone(),
        }
    }

    /// Receive a snapshot after every transition
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        debug_assert_eq!(
            self.phase.state().is_streaming(),
            self.streams.has_live_stream(),
            "live stream must exist exactly while streaming"
        );
        debug!(state = %self.phase.state(), "Session transition");
        self.publish();
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    fn fail(&mut self, error: SessionError) -> SessionResult<()> {
        warn!(error = %error, state = %self.state(), "Session error");
        self.last_error = Some(error.clone());
        self.publish();
        Err(error)
    }

    fn reject_busy(&self) -> SessionResult<()> {
        warn!(state = %self.state(), "Intent rejected while exporting");
        Err(SessionError::Busy)
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.streams.release();
    }
}

/// Keeps the session consistent across an awaited transition
///
/// Unless disarmed, dropping the guard moves the session to `fallback`,
/// releasing the stream first when the fallback is not a streaming phase.
/// This also runs when the transition's future is dropped mid-await.
struct PhaseGuard<'a> {
    session: &'a mut CaptureSession,
    fallback: Option<Phase>,
}

impl<'a> PhaseGuard<'a> {
    fn new(session: &'a mut CaptureSession, fallback: Phase) -> Self {
        Self {
            session,
            fallback: Some(fallback),
        }
    }

    /// The transition settled the phase itself
    fn disarm(mut self) {
        self.fallback = None;
    }
}

impl std::ops::Deref for PhaseGuard<'_> {
    type Target = CaptureSession;

    fn deref(&self) -> &CaptureSession {
        self.session
    }
}

impl std::ops::DerefMut for PhaseGuard<'_> {
    fn deref_mut(&mut self) -> &mut CaptureSession {
        self.session
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        let Some(phase) = self.fallback.take() else {
            return;
        };
        if !phase.state().is_streaming() {
            self.session.streams.release();
        }
        self.session.set_phase(phase);
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("state", &self.state())
            .field("facing", &self.facing)
            .field("streams", &self.streams)
            .field("last_error", &self.last_error)
            .finish()
    }
}

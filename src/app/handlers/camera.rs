// SPDX-License-Identifier: GPL-3.0-only

//! Camera lifecycle handlers
//!
//! Handles starting the camera, flipping between facings, retake, and
//! teardown.

use crate::app::state::Phase;
use crate::app::{CaptureSession, PhaseGuard};
use crate::backends::camera::Facing;
use crate::errors::SessionResult;
use tracing::{debug, info};

impl CaptureSession {
    /// Open the camera from `Idle`
    ///
    /// Uses the most recent facing (initially the configured one). On failure
    /// the session stays idle; calling this again retries.
    pub async fn start(&mut self) -> SessionResult<()> {
        match self.phase {
            Phase::Idle => {}
            Phase::Exporting(..) => return self.reject_busy(),
            Phase::Streaming(_) | Phase::Captured(_) => {
                debug!(state = %self.state(), "Start ignored");
                return Ok(());
            }
        }

        self.last_error = None;
        self.open_stream(self.facing).await
    }

    /// Switch to the other camera while streaming
    ///
    /// If the other camera cannot be opened, or this future is dropped before
    /// it opens, the session falls back to idle rather than keeping a
    /// half-live stream.
    pub async fn flip(&mut self) -> SessionResult<()> {
        let current = match self.phase {
            Phase::Streaming(facing) => facing,
            Phase::Exporting(..) => return self.reject_busy(),
            Phase::Idle | Phase::Captured(_) => {
                debug!(state = %self.state(), "Flip ignored, camera not streaming");
                return Ok(());
            }
        };

        let next = current.opposite();
        info!(from = %current, to = %next, "Flipping camera");

        self.last_error = None;
        let mut session = PhaseGuard::new(self, Phase::Idle);
        session.streams.release();
        let result = session.open_stream(next).await;
        session.disarm();
        result
    }

    /// Discard the captured image and reopen the last used camera
    ///
    /// Without a captured image this does nothing.
    pub async fn retake(&mut self) -> SessionResult<()> {
        match self.phase {
            Phase::Captured(_) => {}
            Phase::Exporting(..) => return self.reject_busy(),
            Phase::Idle | Phase::Streaming(_) => {
                debug!(state = %self.state(), "Retake ignored, nothing captured");
                return Ok(());
            }
        }

        info!(facing = %self.facing, "Retaking photo");

        self.last_error = None;
        self.last_export = None;
        self.set_phase(Phase::Idle);
        self.open_stream(self.facing).await
    }

    /// Release any live stream and end the session, whatever the state
    pub fn teardown(&mut self) {
        info!(state = %self.state(), "Tearing down capture session");

        self.streams.release();
        self.set_phase(Phase::Idle);
    }

    async fn open_stream(&mut self, facing: Facing) -> SessionResult<()> {
        let acquired = self.streams.acquire(facing).await.map(|_| ());

        match acquired {
            Ok(()) => {
                self.facing = facing;
                self.set_phase(Phase::Streaming(facing));
                Ok(())
            }
            Err(e) => {
                self.set_phase(Phase::Idle);
                self.fail(e.into())
            }
        }
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Photo capture handler

use crate::app::CaptureSession;
use crate::app::state::Phase;
use crate::errors::{SessionError, SessionResult};
use tracing::{debug, info};

impl CaptureSession {
    /// Capture the current frame and stop the camera
    ///
    /// A failed capture leaves the session streaming so the user can try
    /// again. A new capture always replaces any earlier image.
    pub async fn capture(&mut self) -> SessionResult<()> {
        match self.phase {
            Phase::Streaming(_) => {}
            Phase::Exporting(..) => return self.reject_busy(),
            Phase::Idle | Phase::Captured(_) => {
                debug!(state = %self.state(), "Capture ignored, camera not streaming");
                return Ok(());
            }
        }

        self.last_error = None;

        let Some(handle) = self.streams.active() else {
            return self.fail(SessionError::CaptureFailed("No live stream".into()));
        };
        let result = self.capture.capture(handle).await;

        let image = match result {
            Ok(image) => image,
            Err(e) => return self.fail(e.into()),
        };

        info!(
            width = image.width(),
            height = image.height(),
            bytes = image.bytes().len(),
            "Photo captured, releasing camera"
        );

        // Camera is not needed while reviewing or exporting
        self.streams.release();
        self.last_export = None;
        self.set_phase(Phase::Captured(image));
        Ok(())
    }
}

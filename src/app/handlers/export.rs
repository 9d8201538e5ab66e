// SPDX-License-Identifier: GPL-3.0-only

//! Export handler

use crate::app::state::Phase;
use crate::app::{CaptureSession, PhaseGuard};
use crate::errors::{SessionError, SessionResult};
use crate::pipelines::export::ExportRequest;
use tracing::{debug, info, warn};

impl CaptureSession {
    /// Export the captured image
    ///
    /// The session is `Exporting` while the action runs and always returns to
    /// `Captured` afterwards, whether the export succeeded, was dismissed,
    /// failed, or was abandoned by dropping this future.
    pub async fn export(&mut self, request: ExportRequest) -> SessionResult<()> {
        let image = match &self.phase {
            Phase::Captured(image) => image.clone(),
            Phase::Exporting(..) => return self.reject_busy(),
            Phase::Idle | Phase::Streaming(_) => {
                debug!(state = %self.state(), "Export ignored, nothing captured");
                return Ok(());
            }
        };

        self.last_error = None;
        let channel = self.exporter.resolve(request, &image);
        self.set_phase(Phase::Exporting(channel, image.clone()));

        let mut session = PhaseGuard::new(self, Phase::Captured(image.clone()));
        let result = session.exporter.run(request, channel, &image).await;

        let outcome = match result {
            Ok(report) => {
                info!(
                    channel = %report.channel,
                    fell_back = report.fell_back(),
                    outcome = ?report.outcome,
                    "Export finished"
                );
                session.last_export = Some(report);
                Ok(())
            }
            Err(e) => {
                let error = SessionError::from(e);
                session.last_error = Some(error.clone());
                Err(error)
            }
        };

        drop(session);
        if let Err(error) = &outcome {
            warn!(error = %error, "Export failed, photo kept");
        }
        outcome
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Intent dispatch
//!
//! Routes presentation intents to the handler methods in `handlers`.

use crate::app::CaptureSession;
use crate::app::state::Intent;
use crate::errors::SessionResult;
use tracing::debug;

impl CaptureSession {
    /// Handle one intent to completion
    ///
    /// Errors are also recorded in the session's `last_error`.
    pub async fn update(&mut self, intent: Intent) -> SessionResult<()> {
        debug!(?intent, state = %self.state(), "Handling intent");

        match intent {
            Intent::Start => self.start().await,
            Intent::Capture => self.capture().await,
            Intent::FlipCamera => self.flip().await,
            Intent::Retake => self.retake().await,
            Intent::ExportVia(request) => self.export(request).await,
        }
    }
}

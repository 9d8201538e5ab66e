// SPDX-License-Identifier: GPL-3.0-only

//! Mollycam - capture a single photo from a live camera and export it
//!
//! The library drives a small capture session: open the front or rear camera,
//! show a live preview, freeze one frame as a JPEG, then hand it to the user
//! through the best available channel (native share, file download, or a
//! one-page PDF).
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Capture session state machine and its driver task
//! - [`backends`]: Camera device abstraction and stream management
//! - [`pipelines`]: Photo capture and export pipelines
//! - [`config`]: Read-only session configuration
//! - [`storage`]: Export file naming and writing
//!
//! # Example
//!
//! ```ignore
//! let device = Arc::new(TestPatternDevice::new());
//! let exporter = ExportResolver::new(
//!     Arc::new(UnsupportedShare),
//!     Arc::new(DirectoryDownloadSink::new("/tmp")),
//! );
//! let mut session = CaptureSession::new(device, exporter, &Config::default());
//! session.update(Intent::Start).await?;
//! session.update(Intent::Capture).await?;
//! session.update(Intent::ExportVia(ExportRequest::BestAvailable)).await?;
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{CaptureSession, Intent, SessionDriver, SessionState, Snapshot};
pub use backends::camera::{Facing, MediaDevice};
pub use config::Config;
pub use errors::{SessionError, SessionResult};
pub use pipelines::export::{ExportChannel, ExportOutcome, ExportReport, ExportRequest, ExportResolver};
pub use pipelines::photo::CapturedImage;

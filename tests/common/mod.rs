// SPDX-License-Identifier: GPL-3.0-only

//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use mollycam::app::{CaptureSession, Snapshot};
use mollycam::backends::camera::{
    BackendError, BackendResult, Facing, LiveStream, MediaDevice, StreamConstraints,
};
use mollycam::backends::virtual_camera::TestPatternDevice;
use mollycam::errors::ExportError;
use mollycam::pipelines::export::{
    DocumentComposer, DownloadSink, ExportResolver, ShareFile, ShareOutcome, ShareTarget,
};
use mollycam::pipelines::photo::{CapturedImage, ImageEncoding};
use mollycam::{Config, SessionState};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Small frames keep JPEG encoding fast in debug builds
pub const TEST_WIDTH: u32 = 64;
pub const TEST_HEIGHT: u32 = 48;

pub fn test_config() -> Config {
    Config {
        preferred_width: TEST_WIDTH,
        preferred_height: TEST_HEIGHT,
        ..Config::default()
    }
}

/// Device whose behavior per facing can be changed between requests
#[derive(Default)]
pub struct ScriptedDevice {
    missing: Mutex<HashSet<Facing>>,
    blank: Mutex<bool>,
    next_id: AtomicU64,
    live: Mutex<HashSet<u64>>,
    requests: Mutex<Vec<Facing>>,
    stops: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make requests for `facing` fail until [`restore`](Self::restore)
    pub fn remove(&self, facing: Facing) {
        self.missing.lock().unwrap().insert(facing);
    }

    pub fn restore(&self, facing: Facing) {
        self.missing.lock().unwrap().remove(&facing);
    }

    /// Streams open but never deliver a frame
    pub fn set_blank(&self, blank: bool) {
        *self.blank.lock().unwrap() = blank;
    }

    /// Hold every stream request for `delay` before answering
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn live_streams(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    /// Total `stop_stream` calls received
    pub fn stop_calls(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Facing> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaDevice for ScriptedDevice {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn request_stream(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream> {
        self.requests.lock().unwrap().push(constraints.facing);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.missing.lock().unwrap().contains(&constraints.facing) {
            return Err(BackendError::PermissionDenied(format!(
                "{} camera blocked",
                constraints.facing
            )));
        }

        let frame = if *self.blank.lock().unwrap() {
            None
        } else {
            Some(Arc::new(TestPatternDevice::render(
                constraints.facing,
                constraints.preferred_width,
                constraints.preferred_height,
            )))
        };
        let (_sender, frames) = watch::channel(frame);

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().insert(id);
        Ok(LiveStream {
            id,
            facing: constraints.facing,
            frames,
        })
    }

    fn stop_stream(&self, stream: &LiveStream) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.live.lock().unwrap().remove(&stream.id);
    }
}

/// Share target with a scripted answer
pub struct RecordingShare {
    supports_files: bool,
    outcome: Result<ShareOutcome, ExportError>,
    shared: Mutex<Vec<(ShareFile, String)>>,
}

impl RecordingShare {
    pub fn accepting() -> Self {
        Self::answering(Ok(ShareOutcome::Shared))
    }

    pub fn answering(outcome: Result<ShareOutcome, ExportError>) -> Self {
        Self {
            supports_files: true,
            outcome,
            shared: Mutex::new(Vec::new()),
        }
    }

    pub fn without_file_support() -> Self {
        Self {
            supports_files: false,
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> Vec<(ShareFile, String)> {
        self.shared.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShareTarget for RecordingShare {
    fn supports_files(&self) -> bool {
        self.supports_files
    }

    fn can_share(&self, file: &ShareFile) -> bool {
        self.supports_files && file.mime_type == "image/jpeg"
    }

    async fn share(&self, file: ShareFile, title: &str) -> Result<ShareOutcome, ExportError> {
        self.shared.lock().unwrap().push((file, title.to_string()));
        self.outcome.clone()
    }
}

/// Download sink that keeps files in memory
///
/// When given a snapshot receiver it also records the session state seen
/// while each save is in progress.
#[derive(Default)]
pub struct RecordingDownload {
    fail_with: Option<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    observer: Mutex<Option<watch::Receiver<Snapshot>>>,
    states_during_save: Mutex<Vec<SessionState>>,
}

impl RecordingDownload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Each save takes `delay` to complete
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Most saves ever running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn observe(&self, snapshots: watch::Receiver<Snapshot>) {
        *self.observer.lock().unwrap() = Some(snapshots);
    }

    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }

    pub fn states_during_save(&self) -> Vec<SessionState> {
        self.states_during_save.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadSink for RecordingDownload {
    async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf, ExportError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let state = self
            .observer
            .lock()
            .unwrap()
            .as_ref()
            .map(|observer| observer.borrow().state);
        if let Some(state) = state {
            self.states_during_save.lock().unwrap().push(state);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = &self.fail_with {
            return Err(ExportError::SaveFailed(message.clone()));
        }
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), data.to_vec()));
        Ok(PathBuf::from("/downloads").join(filename))
    }
}

/// Composer that always fails
pub struct FailingComposer;

impl DocumentComposer for FailingComposer {
    fn compose(&self, _image: &CapturedImage) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::DocumentFailed("composer offline".into()))
    }
}

/// Everything a session test needs to inspect afterwards
pub struct Harness {
    pub session: CaptureSession,
    pub device: Arc<ScriptedDevice>,
    pub share: Arc<RecordingShare>,
    pub downloads: Arc<RecordingDownload>,
}

impl Harness {
    pub fn new(share: RecordingShare) -> Self {
        Self::with_downloads(share, RecordingDownload::new())
    }

    pub fn with_downloads(share: RecordingShare, downloads: RecordingDownload) -> Self {
        let device = Arc::new(ScriptedDevice::new());
        let share = Arc::new(share);
        let downloads = Arc::new(downloads);
        let exporter = ExportResolver::new(share.clone(), downloads.clone());
        let session = CaptureSession::new(device.clone(), exporter, &test_config());
        downloads.observe(session.subscribe());

        Self {
            session,
            device,
            share,
            downloads,
        }
    }
}

/// A tiny valid JPEG wrapped as a capture
pub fn sample_image() -> CapturedImage {
    let frame = TestPatternDevice::render(Facing::Front, TEST_WIDTH, TEST_HEIGHT);
    let encoder = mollycam::pipelines::photo::PhotoEncoder::default();
    let bytes = encoder.encode_jpeg(&frame).expect("encode sample");
    CapturedImage::new(
        bytes,
        ImageEncoding::Jpeg,
        TEST_WIDTH,
        TEST_HEIGHT,
        chrono::Local::now(),
    )
}

// SPDX-License-Identifier: GPL-3.0-only

//! Direct V4L2 camera capture
//!
//! Each stream runs its own capture thread that negotiates MJPEG (falling back
//! to YUYV) at the preferred size and publishes every decoded frame into the
//! stream's latest-frame slot. V4L2 has no notion of facing direction, so the
//! first capture node is treated as the front camera and the second as rear.

use super::MediaDevice;
use super::types::*;
use async_trait::async_trait;
use futures::channel::oneshot;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// Number of mmap buffers requested from the driver
const BUFFER_COUNT: u32 = 4;

/// V4L2 capture device pair
pub struct V4l2Device {
    front: Option<PathBuf>,
    rear: Option<PathBuf>,
    next_id: AtomicU64,
    running: Mutex<HashMap<u64, Arc<AtomicBool>>>,
}

impl V4l2Device {
    pub fn new(front: Option<PathBuf>, rear: Option<PathBuf>) -> Self {
        Self {
            front,
            rear,
            next_id: AtomicU64::new(0),
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Pick the first two nodes that advertise video capture
    pub fn discover() -> Self {
        let mut nodes = v4l::context::enum_devices()
            .into_iter()
            .map(|node| node.path().to_path_buf())
            .filter(|path| is_capture_node(path))
            .collect::<Vec<_>>();
        nodes.sort();

        info!(nodes = ?nodes, "Discovered V4L2 capture nodes");

        let mut nodes = nodes.into_iter();
        Self::new(nodes.next(), nodes.next())
    }

    fn path_for(&self, facing: Facing) -> Option<&PathBuf> {
        match facing {
            Facing::Front => self.front.as_ref(),
            Facing::Rear => self.rear.as_ref(),
        }
    }
}

#[async_trait]
impl MediaDevice for V4l2Device {
    fn name(&self) -> &str {
        "v4l2"
    }

    fn is_available(&self) -> bool {
        self.front.as_ref().is_some_and(|path| path.exists())
    }

    async fn request_stream(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream> {
        let path = self
            .path_for(constraints.facing)
            .cloned()
            .ok_or_else(|| {
                BackendError::DeviceNotFound(format!("No {} camera", constraints.facing))
            })?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let running = Arc::new(AtomicBool::new(true));
        let (frame_sender, frames) = watch::channel(None);
        let (ready_sender, ready) = oneshot::channel();

        let width = constraints.preferred_width;
        let height = constraints.preferred_height;
        let thread_running = running.clone();
        std::thread::Builder::new()
            .name(format!("v4l2-capture-{}", id))
            .spawn(move || {
                capture_loop(&path, width, height, frame_sender, thread_running, ready_sender)
            })?;

        ready
            .await
            .map_err(|_| BackendError::Other("Capture thread exited during setup".into()))??;

        self.running.lock().unwrap().insert(id, running);

        Ok(LiveStream {
            id,
            facing: constraints.facing,
            frames,
        })
    }

    fn stop_stream(&self, stream: &LiveStream) {
        if let Some(running) = self.running.lock().unwrap().remove(&stream.id) {
            debug!(stream_id = stream.id, "Stopping V4L2 capture thread");
            running.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for V4l2Device {
    fn drop(&mut self) {
        for running in self.running.lock().unwrap().values() {
            running.store(false, Ordering::SeqCst);
        }
    }
}

fn is_capture_node(path: &Path) -> bool {
    Device::with_path(path)
        .and_then(|dev| dev.query_caps())
        .map(|caps| {
            caps.capabilities
                .contains(v4l::capability::Flags::VIDEO_CAPTURE)
        })
        .unwrap_or(false)
}

/// Negotiate a frame format, preferring MJPEG
fn negotiate_format(dev: &Device, width: u32, height: u32) -> BackendResult<v4l::Format> {
    for code in [b"MJPG", b"YUYV"] {
        let mut format = dev.format()?;
        format.width = width;
        format.height = height;
        format.fourcc = FourCC::new(code);

        let applied = dev.set_format(&format)?;
        if applied.fourcc == format.fourcc {
            info!(
                width = applied.width,
                height = applied.height,
                fourcc = ?applied.fourcc,
                "Negotiated V4L2 format"
            );
            return Ok(applied);
        }
    }

    Err(BackendError::FormatNotSupported(
        "Device offers neither MJPG nor YUYV".into(),
    ))
}

fn decode_frame(payload: &[u8], format: &v4l::Format) -> Option<CameraFrame> {
    if format.fourcc == FourCC::new(b"MJPG") {
        let decoded = image::load_from_memory_with_format(payload, image::ImageFormat::Jpeg)
            .ok()?
            .to_rgb8();
        let (width, height) = decoded.dimensions();
        return Some(CameraFrame::packed(
            width,
            height,
            PixelFormat::Rgb24,
            decoded.into_raw(),
        ));
    }

    let stride = format.stride.max(PixelFormat::Yuyv.row_bytes(format.width) as u32);
    Some(CameraFrame {
        width: format.width,
        height: format.height,
        data: Arc::from(payload),
        format: PixelFormat::Yuyv,
        stride,
        captured_at: Instant::now(),
    })
}

/// Main capture loop running in a separate thread
fn capture_loop(
    path: &Path,
    width: u32,
    height: u32,
    frames: FrameSender,
    running: Arc<AtomicBool>,
    ready: oneshot::Sender<BackendResult<()>>,
) {
    info!(path = %path.display(), width, height, "Opening V4L2 device");

    let mut dev = match Device::with_path(path) {
        Ok(dev) => dev,
        Err(e) => {
            let _ = ready.send(Err(e.into()));
            return;
        }
    };

    let format = match negotiate_format(&dev, width, height) {
        Ok(format) => format,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let mut stream = match MmapStream::with_buffers(&mut dev, Type::VideoCapture, BUFFER_COUNT) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e.into()));
            return;
        }
    };

    let _ = ready.send(Ok(()));

    while running.load(Ordering::SeqCst) {
        match stream.next() {
            Ok((buf, meta)) => {
                let used = (meta.bytesused as usize).min(buf.len());
                let payload = if used > 0 { &buf[..used] } else { buf };

                match decode_frame(payload, &format) {
                    Some(frame) => {
                        if frames.send(Some(Arc::new(frame))).is_err() {
                            debug!("All frame receivers dropped");
                            break;
                        }
                    }
                    None => warn!(sequence = meta.sequence, "Dropping undecodable frame"),
                }
            }
            Err(e) => {
                error!(error = %e, "V4L2 capture failed");
                break;
            }
        }
    }

    info!(path = %path.display(), "V4L2 capture stopped");
}

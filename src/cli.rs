// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for capture sessions
//!
//! This module provides command-line functionality for:
//! - Capturing and exporting a single photo
//! - Listing usable export channels

use crate::{ShareKind, SourceKind};
use mollycam::app::CaptureSession;
use mollycam::backends::camera::{Facing, MediaDevice};
use mollycam::backends::virtual_camera::{ImageFileDevice, TestPatternDevice};
use mollycam::pipelines::export::{
    DirectoryDownloadSink, ExportChannel, ExportOutcome, ExportRequest, ExportResolver,
    ShareTarget, SystemOpenShare, UnsupportedShare,
};
use mollycam::pipelines::photo::{FrameCapture, PhotoEncoder};
use mollycam::{Config, Intent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// How long to wait for the first frame after the camera opens
const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SnapOptions {
    pub source: SourceKind,
    pub image: Option<PathBuf>,
    pub facing: Option<Facing>,
    pub flip: bool,
    pub export: ExportRequest,
    pub out: Option<PathBuf>,
    pub share: ShareKind,
    pub json: bool,
}

/// Load the config file if one was given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = Config::load(path)?;
            info!(path = %path.display(), "Loaded configuration");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Capture one photo and export it
pub fn snap(mut config: Config, options: SnapOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(facing) = options.facing {
        config.initial_facing = facing;
    }

    let device = open_device(options.source, options.image.as_deref())?;
    let out_dir = options.out.clone().unwrap_or_else(|| config.download_dir());
    let exporter = build_exporter(&config, options.share, out_dir);

    println!("Using camera source: {}", device.name());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = CaptureSession::new(device, exporter, &config);

        session.update(Intent::Start).await?;
        if options.flip {
            session.update(Intent::FlipCamera).await?;
        }
        println!("Streaming from {} camera", session.facing());

        wait_for_first_frame(&session).await;

        println!("Capturing...");
        session.update(Intent::Capture).await?;
        if let Some(image) = session.captured_image() {
            println!("Captured {}x{} JPEG", image.width(), image.height());
        }

        session.update(Intent::ExportVia(options.export)).await?;

        match session.last_export() {
            Some(report) if options.json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            Some(report) => {
                if report.fell_back() {
                    println!(
                        "{} is not available here, used {} instead",
                        describe_request(report.requested),
                        report.channel
                    );
                }
                match &report.outcome {
                    ExportOutcome::Saved(path) => println!("Photo saved: {}", path.display()),
                    ExportOutcome::Shared => println!("Photo shared"),
                    ExportOutcome::ShareDismissed => println!("Share dismissed"),
                }
            }
            None => warn!("Export finished without a report"),
        }

        session.teardown();
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// List export channels usable with the given share target
pub fn list_channels(config: Config, share: ShareKind) -> Result<(), Box<dyn std::error::Error>> {
    let exporter = build_exporter(&config, share, config.download_dir());

    // Usability depends on the image, so probe with a real capture
    let probe = FrameCapture::new(PhotoEncoder::new(config.jpeg_quality()))
        .capture_frame(&TestPatternDevice::render(Facing::Front, 16, 16))?;
    let usable = exporter.usable_channels(&probe);

    println!("Export channels:");
    println!();
    for channel in ExportChannel::ALL {
        let status = if usable.contains(&channel) {
            "available"
        } else {
            "unavailable"
        };
        let auto = if channel.is_auto_selectable() {
            " (auto)"
        } else {
            ""
        };
        println!("  {:<16} {}{}", channel.as_str(), status, auto);
    }
    println!();
    println!(
        "Best available: {}",
        exporter.resolve(ExportRequest::BestAvailable, &probe)
    );

    Ok(())
}

fn open_device(
    source: SourceKind,
    image: Option<&Path>,
) -> Result<Arc<dyn MediaDevice>, Box<dyn std::error::Error>> {
    let device: Arc<dyn MediaDevice> = match source {
        SourceKind::TestPattern => Arc::new(TestPatternDevice::new()),
        SourceKind::Image => {
            let path = image.ok_or("--image is required with --source image")?;
            Arc::new(ImageFileDevice::new(path))
        }
        #[cfg(target_os = "linux")]
        SourceKind::V4l2 => Arc::new(mollycam::backends::camera::v4l2::V4l2Device::discover()),
        #[cfg(not(target_os = "linux"))]
        SourceKind::V4l2 => return Err("V4L2 capture is only available on Linux".into()),
    };

    if !device.is_available() {
        return Err(format!("No camera found for source {:?}", source).into());
    }
    Ok(device)
}

fn build_exporter(config: &Config, share: ShareKind, out_dir: PathBuf) -> ExportResolver {
    let share: Arc<dyn ShareTarget> = match share {
        ShareKind::None => Arc::new(UnsupportedShare),
        ShareKind::System => Arc::new(SystemOpenShare::new()),
    };

    ExportResolver::new(share, Arc::new(DirectoryDownloadSink::new(out_dir)))
        .with_share_title(config.share_title.clone())
}

async fn wait_for_first_frame(session: &CaptureSession) {
    let Some(mut preview) = session.live_preview() else {
        return;
    };

    match tokio::time::timeout(FIRST_FRAME_TIMEOUT, preview.wait_for(|frame| frame.is_some())).await
    {
        Ok(Ok(_)) => {}
        Ok(Err(_)) => warn!("Camera stream closed before the first frame"),
        Err(_) => warn!("Timed out waiting for the first frame"),
    }
}

fn describe_request(request: ExportRequest) -> String {
    match request {
        ExportRequest::BestAvailable => "Best available channel".to_string(),
        ExportRequest::Channel(channel) => channel.to_string(),
    }
}

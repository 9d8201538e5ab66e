// SPDX-License-Identifier: GPL-3.0-only

//! Still image files served as a camera

use super::StreamRegistry;
use crate::backends::camera::{
    BackendError, BackendResult, CameraFrame, Facing, LiveStream, MediaDevice, PixelFormat,
    StreamConstraints,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load an image file as an RGBA frame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(io) => BackendError::from(io),
        other => BackendError::Other(format!(
            "Failed to load image '{}': {}",
            path.display(),
            other
        )),
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    info!(width, height, "Image loaded successfully");

    Ok(CameraFrame::packed(
        width,
        height,
        PixelFormat::Rgba,
        rgba.into_raw(),
    ))
}

/// Serves one image file per facing direction
///
/// The file is read on every stream request, so replacing it on disk between
/// captures changes what the next stream shows. The preferred resolution is
/// ignored; frames keep the image's own size.
#[derive(Debug)]
pub struct ImageFileDevice {
    front: PathBuf,
    rear: Option<PathBuf>,
    streams: StreamRegistry,
}

impl ImageFileDevice {
    pub fn new(front: impl Into<PathBuf>) -> Self {
        Self {
            front: front.into(),
            rear: None,
            streams: StreamRegistry::default(),
        }
    }

    pub fn with_rear(mut self, rear: impl Into<PathBuf>) -> Self {
        self.rear = Some(rear.into());
        self
    }
}

#[async_trait]
impl MediaDevice for ImageFileDevice {
    fn name(&self) -> &str {
        "image-file"
    }

    fn is_available(&self) -> bool {
        self.front.is_file()
    }

    async fn request_stream(&self, constraints: &StreamConstraints) -> BackendResult<LiveStream> {
        let path = match constraints.facing {
            Facing::Front => self.front.clone(),
            Facing::Rear => self
                .rear
                .clone()
                .ok_or_else(|| BackendError::DeviceNotFound("No rear image configured".into()))?,
        };

        let frame = tokio::task::spawn_blocking(move || load_image_as_frame(&path))
            .await
            .map_err(|e| BackendError::Other(format!("Image load task failed: {}", e)))??;

        Ok(self.streams.open(constraints.facing, frame))
    }

    fn stop_stream(&self, stream: &LiveStream) {
        self.streams.close(stream.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_not_found() {
        let result = load_image_as_frame(Path::new("/nonexistent/mollycam.png"));
        assert!(matches!(result, Err(BackendError::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_serves_image_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("still.png");
        image::RgbaImage::from_pixel(7, 5, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let device = ImageFileDevice::new(&path);
        assert!(device.is_available());

        let stream = device
            .request_stream(&StreamConstraints {
                facing: Facing::Front,
                preferred_width: 1920,
                preferred_height: 1080,
            })
            .await
            .unwrap();
        let frame = stream.frames.borrow().clone().unwrap();
        assert_eq!((frame.width, frame.height), (7, 5));

        let rear = device
            .request_stream(&StreamConstraints {
                facing: Facing::Rear,
                preferred_width: 1920,
                preferred_height: 1080,
            })
            .await;
        assert!(rear.is_err());
    }
}

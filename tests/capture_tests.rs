// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for frame capture

mod common;

use common::ScriptedDevice;
use mollycam::backends::camera::{CameraFrame, DeviceStreamManager, Facing, PixelFormat};
use mollycam::backends::virtual_camera::{ImageFileDevice, TestPatternDevice};
use mollycam::errors::PhotoError;
use mollycam::pipelines::photo::{FrameCapture, ImageEncoding, PhotoEncoder};
use std::sync::Arc;

#[tokio::test]
async fn test_capture_keeps_frame_dimensions() {
    let capture = FrameCapture::default();

    for (width, height) in [(64, 48), (33, 17), (1, 1), (48, 64)] {
        let device = Arc::new(TestPatternDevice::with_resolution(width, height));
        let mut manager = DeviceStreamManager::new(device, 1920, 1080);
        let handle = manager.acquire(Facing::Front).await.unwrap();

        let image = capture.capture(handle).await.unwrap();

        assert_eq!(image.encoding(), ImageEncoding::Jpeg);
        assert_eq!(image.dimensions(), (width, height));
        let decoded = image::load_from_memory(image.bytes()).unwrap();
        assert_eq!(
            (decoded.width(), decoded.height()),
            (width, height),
            "decoded size for {}x{}",
            width,
            height
        );
    }
}

#[tokio::test]
async fn test_capture_is_deterministic() {
    let device = Arc::new(TestPatternDevice::with_resolution(40, 30));
    let mut manager = DeviceStreamManager::new(device, 1920, 1080);
    let handle = manager.acquire(Facing::Rear).await.unwrap();
    let capture = FrameCapture::default();

    let first = capture.capture(handle).await.unwrap();
    let second = capture.capture(handle).await.unwrap();

    assert_eq!(first.bytes(), second.bytes());
}

#[tokio::test]
async fn test_capture_without_frame() {
    let device = Arc::new(ScriptedDevice::new());
    device.set_blank(true);
    let mut manager = DeviceStreamManager::new(device, 32, 32);
    let handle = manager.acquire(Facing::Front).await.unwrap();

    let result = FrameCapture::default().capture(handle).await;

    assert_eq!(result, Err(PhotoError::NoFrameAvailable));
}

#[tokio::test]
async fn test_capture_from_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("still.png");
    image::RgbImage::from_pixel(20, 10, image::Rgb([200, 100, 50]))
        .save(&path)
        .unwrap();

    let device = Arc::new(ImageFileDevice::new(&path));
    let mut manager = DeviceStreamManager::new(device, 1920, 1080);
    let handle = manager.acquire(Facing::Front).await.unwrap();

    let image = FrameCapture::default().capture(handle).await.unwrap();

    assert_eq!(image.dimensions(), (20, 10));
}

#[test]
fn test_capture_frame_directly() {
    let capture = FrameCapture::default();

    let image = capture
        .capture_frame(&TestPatternDevice::render(Facing::Rear, 24, 18))
        .unwrap();
    assert_eq!(image.dimensions(), (24, 18));
    assert!(!image.bytes().is_empty());

    let empty = CameraFrame::packed(0, 0, PixelFormat::Rgba, Vec::new());
    assert_eq!(capture.capture_frame(&empty), Err(PhotoError::NoFrameAvailable));
}

#[test]
fn test_quality_floor() {
    assert_eq!(PhotoEncoder::new(50).quality(), 90);
    assert_eq!(PhotoEncoder::new(100).quality(), 100);
    assert!(PhotoEncoder::default().quality() >= 90);
}

// SPDX-License-Identifier: GPL-3.0-only
//! Pixel format conversion for captured frames
//!
//! Every conversion produces tightly packed RGB24, which is what the JPEG
//! encoder consumes.

use super::types::{CameraFrame, PixelFormat};

/// Convert YUYV (YUV 4:2:2) to RGB
///
/// YUYV format: Y0 U0 Y1 V0 - each 4-byte group encodes 2 pixels.
/// Uses BT.601 coefficients for YUV to RGB conversion.
pub fn yuyv_to_rgb(row: &[u8], width: u32, out: &mut Vec<u8>) {
    let mut remaining = width as usize;

    for chunk in row.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            if remaining == 0 {
                return;
            }
            out.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            out.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
            out.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
            remaining -= 1;
        }
    }
}

/// Convert RGBA to RGB by dropping alpha
pub fn rgba_to_rgb(row: &[u8], out: &mut Vec<u8>) {
    for chunk in row.chunks_exact(4) {
        out.extend_from_slice(&chunk[..3]);
    }
}

/// Convert a whole frame to packed RGB24, honouring its stride
///
/// Returns `None` if the buffer is too small for the declared geometry.
pub fn frame_to_rgb(frame: &CameraFrame) -> Option<Vec<u8>> {
    if !frame.is_complete() {
        return None;
    }

    let width = frame.width;
    let row_bytes = frame.format.row_bytes(width);
    let stride = frame.stride as usize;
    let mut rgb = Vec::with_capacity(width as usize * frame.height as usize * 3);

    for y in 0..frame.height as usize {
        let start = y * stride;
        let row = &frame.data[start..start + row_bytes];
        match frame.format {
            PixelFormat::Rgba => rgba_to_rgb(row, &mut rgb),
            PixelFormat::Rgb24 => rgb.extend_from_slice(row),
            PixelFormat::Yuyv => yuyv_to_rgb(row, width, &mut rgb),
        }
    }

    Some(rgb)
}

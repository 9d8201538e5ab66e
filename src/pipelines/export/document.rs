// SPDX-License-Identifier: GPL-3.0-only

//! Single-page document export
//!
//! The captured JPEG is embedded as-is (DCTDecode) on one A4 portrait page
//! with a white background. The image is scaled to fill the page height and
//! centered horizontally; wide images overflow the page edges evenly.

use crate::constants::page;
use crate::errors::ExportError;
use crate::pipelines::photo::CapturedImage;
use image::{ImageDecoder, ImageReader};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::Cursor;
use tracing::debug;

/// Composes a captured image into a paginated document
///
/// Implementations are pure: the same image yields the same document.
pub trait DocumentComposer: Send + Sync {
    fn compose(&self, image: &CapturedImage) -> Result<Vec<u8>, ExportError>;
}

/// Where the image lands on the page, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Scale to the full page height, center horizontally
    pub fn fill_height(image_width: u32, image_height: u32, page_width: f32, page_height: f32) -> Self {
        let scale = page_height / image_height as f32;
        let width = image_width as f32 * scale;
        Self {
            x: (page_width - width) / 2.0,
            y: 0.0,
            width,
            height: page_height,
        }
    }
}

/// PDF composer built on `lopdf`
#[derive(Debug, Clone, Copy)]
pub struct PdfComposer {
    page_width: f32,
    page_height: f32,
}

impl PdfComposer {
    pub fn new() -> Self {
        Self {
            page_width: page::WIDTH_PT,
            page_height: page::HEIGHT_PT,
        }
    }

    pub fn page_size(&self) -> (f32, f32) {
        (self.page_width, self.page_height)
    }
}

impl Default for PdfComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

impl DocumentComposer for PdfComposer {
    fn compose(&self, image: &CapturedImage) -> Result<Vec<u8>, ExportError> {
        // Headers are enough for the pixel geometry and channel layout
        let decoder = ImageReader::new(Cursor::new(image.bytes()))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.into_decoder())
            .map_err(|e| {
                ExportError::DocumentFailed(format!("Failed to read image header: {}", e))
            })?;
        let (width, height) = decoder.dimensions();
        if width == 0 || height == 0 {
            return Err(ExportError::DocumentFailed("Image has no pixels".into()));
        }
        let color_space = if decoder.color_type().has_color() {
            "DeviceRGB"
        } else {
            "DeviceGray"
        };

        let placement = Placement::fill_height(width, height, self.page_width, self.page_height);
        debug!(width, height, ?placement, "Composing document page");

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.bytes().to_vec(),
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new("rg", vec![1.into(), 1.into(), 1.into()]),
                Operation::new(
                    "re",
                    vec![0.into(), 0.into(), real(self.page_width), real(self.page_height)],
                ),
                Operation::new("f", vec![]),
                Operation::new("Q", vec![]),
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(placement.width),
                        0.into(),
                        0.into(),
                        real(placement.height),
                        real(placement.x),
                        real(placement.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        });

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), real(self.page_width), real(self.page_height)],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| ExportError::DocumentFailed(format!("Failed to write document: {}", e)))?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipelines::photo::ImageEncoding;
    use chrono::Local;

    #[test]
    fn test_portrait_image_fits_width_centered() {
        let placement = Placement::fill_height(1000, 2000, 600.0, 800.0);
        assert_eq!(placement.height, 800.0);
        assert_eq!(placement.width, 400.0);
        assert_eq!(placement.x, 100.0);
        assert_eq!(placement.y, 0.0);
    }

    #[test]
    fn test_landscape_image_overflows_evenly() {
        let placement = Placement::fill_height(1600, 900, 600.0, 900.0);
        assert_eq!(placement.width, 1600.0);
        assert_eq!(placement.x, -500.0);
    }

    fn jpeg(picture: image::DynamicImage) -> CapturedImage {
        let mut bytes = Vec::new();
        picture
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        CapturedImage::new(
            bytes,
            ImageEncoding::Jpeg,
            picture.width(),
            picture.height(),
            Local::now(),
        )
    }

    fn embedded_image(pdf: &[u8]) -> lopdf::Dictionary {
        let doc = Document::load_mem(pdf).unwrap();
        doc.objects
            .values()
            .find_map(|object| match object {
                Object::Stream(stream)
                    if stream.dict.get(b"Subtype").and_then(Object::as_name).ok()
                        == Some(b"Image".as_slice()) =>
                {
                    Some(stream.dict.clone())
                }
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_image_geometry_from_header() {
        let rgb = image::RgbImage::from_pixel(30, 20, image::Rgb([10, 200, 90]));
        let pdf = PdfComposer::new()
            .compose(&jpeg(image::DynamicImage::ImageRgb8(rgb)))
            .unwrap();

        let dict = embedded_image(&pdf);
        assert_eq!(dict.get(b"Width").unwrap().as_i64().unwrap(), 30);
        assert_eq!(dict.get(b"Height").unwrap().as_i64().unwrap(), 20);
        assert_eq!(dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceRGB");
    }

    #[test]
    fn test_grayscale_image_uses_gray_color_space() {
        let gray = image::GrayImage::from_pixel(8, 12, image::Luma([128]));
        let pdf = PdfComposer::new()
            .compose(&jpeg(image::DynamicImage::ImageLuma8(gray)))
            .unwrap();

        let dict = embedded_image(&pdf);
        assert_eq!(dict.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceGray");
    }

    #[test]
    fn test_not_an_image_fails() {
        let bogus = CapturedImage::new(vec![0u8; 16], ImageEncoding::Jpeg, 1, 1, Local::now());
        assert!(matches!(
            PdfComposer::new().compose(&bogus),
            Err(ExportError::DocumentFailed(_))
        ));
    }

    #[test]
    fn test_default_page_is_a4() {
        let (w, h) = PdfComposer::new().page_size();
        assert!((w - 595.28).abs() < 0.01);
        assert!((h - 841.89).abs() < 0.01);
    }
}

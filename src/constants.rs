// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Resolution hint sent with every stream request
pub const DEFAULT_PREFERRED_WIDTH: u32 = 1920;
pub const DEFAULT_PREFERRED_HEIGHT: u32 = 1080;

/// JPEG quality used for captures (0-100)
pub const JPEG_QUALITY: u8 = 92;

/// Captures are never encoded below this quality
pub const MIN_JPEG_QUALITY: u8 = 90;

/// Export naming
pub mod naming {
    /// File name used when handing a capture to the share target
    pub const SHARE_FILE_NAME: &str = "photo.jpg";

    /// Title attached to share requests
    pub const SHARE_TITLE: &str = "Photo";

    /// Prefix of downloaded and exported files
    pub const EXPORT_FILE_PREFIX: &str = "mollycam-photo-";

    /// Local timestamp format, ISO 8601 with colons replaced by dashes
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

    pub const JPEG_EXTENSION: &str = "jpg";
    pub const PDF_EXTENSION: &str = "pdf";
}

/// Document page geometry in PDF points (1/72 inch)
pub mod page {
    /// A4 portrait width
    pub const WIDTH_PT: f32 = 595.28;
    /// A4 portrait height
    pub const HEIGHT_PT: f32 = 841.89;
}

/// MIME types
pub mod mime {
    pub const JPEG: &str = "image/jpeg";
}

/// Capacity of the session driver's intent queue
pub const INTENT_QUEUE_CAPACITY: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_quality_meets_minimum() {
        assert!(JPEG_QUALITY >= MIN_JPEG_QUALITY);
        assert!(JPEG_QUALITY <= 100);
    }

    #[test]
    fn test_page_is_portrait() {
        assert!(page::HEIGHT_PT > page::WIDTH_PT);
    }
}

//! Image decoding using the `image` crate.

use crate::error::{Error, Result};
use image::{DynamicImage, ImageFormat};
use tracing::debug;

/// Encoded formats accepted by the classifier pipeline.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Decode raw image bytes.
///
/// The format is sniffed from the content, never from a file name. Payloads
/// larger than `max_bytes` are rejected before decoding.
pub fn decode_image(bytes: &[u8], max_bytes: u64) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(Error::Decode {
            reason: "input is empty".to_string(),
        });
    }

    let len = bytes.len() as u64;
    if len > max_bytes {
        return Err(Error::Decode {
            reason: format!("image is {len} bytes, limit is {max_bytes}"),
        });
    }

    let format = image::guess_format(bytes).map_err(|e| Error::Decode {
        reason: format!("unrecognized image format ({e})"),
    })?;

    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(Error::Decode {
            reason: format!("unsupported image format {format:?} (expected JPEG, PNG or WebP)"),
        });
    }

    let image = image::load_from_memory_with_format(bytes, format).map_err(|e| Error::Decode {
        reason: e.to_string(),
    })?;

    debug!(
        "Decoded {:?} image: {}x{} {:?}",
        format,
        image.width(),
        image.height(),
        image.color()
    );

    Ok(image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, RgbImage};
    use std::io::Cursor;

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let source = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 2, Luma([128])));
        let bytes = encode(&source, ImageFormat::Png);

        let decoded = decode_image(&bytes, 1024 * 1024).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 2));
    }

    #[test]
    fn test_decode_jpeg() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(16, 8));
        let bytes = encode(&source, ImageFormat::Jpeg);

        let decoded = decode_image(&bytes, 1024 * 1024).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_decode_rejects_text() {
        let result = decode_image(b"definitely not an image", 1024);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_decode_rejects_empty() {
        let result = decode_image(&[], 1024);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_decode_rejects_oversized() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(32, 32));
        let bytes = encode(&source, ImageFormat::Png);

        let result = decode_image(&bytes, 10);
        match result {
            Err(Error::Decode { reason }) => assert!(reason.contains("limit")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_unsupported_format() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let bytes = encode(&source, ImageFormat::Bmp);

        let result = decode_image(&bytes, 1024 * 1024);
        match result {
            Err(Error::Decode { reason }) => assert!(reason.contains("unsupported")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_truncated_png() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(64, 64));
        let bytes = encode(&source, ImageFormat::Png);

        let result = decode_image(&bytes[..bytes.len() / 2], 1024 * 1024);
        assert!(matches!(result, Err(Error::Decode { .. })));
    }
}

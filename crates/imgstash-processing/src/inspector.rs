//! Format sniffing
//!
//! The image type is always taken from the decoded bytes, never from a
//! caller-supplied filename or data URL subtype.

use image::ImageFormat;
use imgstash_core::{ImageConfig, SaveError};

pub const SVG_MIME: &str = "image/svg+xml";

/// Sniffed type of a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub mime_type: String,
    /// Canonical extension, always lowercase
    pub extension: &'static str,
}

/// Canonical extension for a mime type.
///
/// Recognized types outside the mapped set fall back to `jpg`.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/webp" => "webp",
        SVG_MIME => "svg",
        _ => "jpg",
    }
}

/// Detect the mime type of `bytes` from their header.
pub fn sniff(bytes: &[u8]) -> Option<String> {
    if looks_like_svg(bytes) {
        return Some(SVG_MIME.to_string());
    }

    let format = image::guess_format(bytes).ok()?;
    let mime_type = match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Png => "image/png",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::WebP => "image/webp",
        other => other.to_mime_type(),
    };
    Some(mime_type.to_string())
}

/// Sniff `bytes` and check the result against the supported extension set.
///
/// Fails with `InvalidImage` when nothing recognizable is found and
/// `UnsupportedType` when the canonical extension is not one of the
/// configured `supported_types`.
pub fn inspect(bytes: &[u8], config: &ImageConfig) -> Result<Inspection, SaveError> {
    let mime_type = sniff(bytes).ok_or_else(|| {
        SaveError::InvalidImage("payload is not a recognized image".to_string())
    })?;
    let extension = extension_for_mime(&mime_type);

    if !config.is_supported(extension) {
        return Err(SaveError::UnsupportedType(extension.to_string()));
    }

    tracing::debug!(mime_type = %mime_type, extension = extension, "Sniffed image type");

    Ok(Inspection {
        mime_type,
        extension,
    })
}

/// SVG is XML text: `<svg ...>` optionally preceded by a BOM, an XML
/// declaration or comments.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let text = head.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with("<svg") {
        return true;
    }
    (text.starts_with("<?xml") || text.starts_with("<!--") || text.starts_with("<!DOCTYPE svg"))
        && text.contains("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::io::Cursor;

    fn supported() -> ImageConfig {
        ImageConfig::default()
    }

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
        let img = match format {
            ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
            _ => img,
        };
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
        buffer
    }

    #[test]
    fn test_sniff_raster_formats() {
        let cases = [
            (ImageFormat::Png, "image/png", "png"),
            (ImageFormat::Jpeg, "image/jpeg", "jpg"),
            (ImageFormat::Gif, "image/gif", "gif"),
            (ImageFormat::Bmp, "image/bmp", "bmp"),
        ];
        for (format, mime, ext) in cases {
            let inspection = inspect(&encoded(format), &supported()).unwrap();
            assert_eq!(inspection.mime_type, mime);
            assert_eq!(inspection.extension, ext);
        }
    }

    #[test]
    fn test_sniff_webp_header() {
        let mut bytes = b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        assert_eq!(sniff(&bytes).as_deref(), Some("image/webp"));
    }

    #[test]
    fn test_sniff_svg() {
        let svg = br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#;
        let inspection = inspect(svg, &supported()).unwrap();
        assert_eq!(inspection.mime_type, SVG_MIME);
        assert_eq!(inspection.extension, "svg");

        assert_eq!(sniff(b"  <svg width=\"1\"/>").as_deref(), Some(SVG_MIME));
        assert_eq!(sniff(b"<?xml version=\"1.0\"?><html/>"), None);
    }

    #[test]
    fn test_non_image_is_invalid() {
        let result = inspect(b"hello, this is plain text", &supported());
        assert!(matches!(result, Err(SaveError::InvalidImage(_))));
    }

    #[test]
    fn test_unsupported_type() {
        let only_png = ImageConfig {
            supported_types: vec!["PNG".to_string()],
            ..Default::default()
        };
        let result = inspect(&encoded(ImageFormat::Gif), &only_png);
        assert!(matches!(result, Err(SaveError::UnsupportedType(ext)) if ext == "gif"));
        assert!(inspect(&encoded(ImageFormat::Png), &only_png).is_ok());
    }

    #[test]
    fn test_unmapped_type_falls_back_to_jpg() {
        // TIFF little-endian magic
        let tiff = b"II*\x00\x08\x00\x00\x00\x00\x00";
        let inspection = inspect(tiff, &supported()).unwrap();
        assert_eq!(inspection.mime_type, "image/tiff");
        assert_eq!(inspection.extension, "jpg");
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/svg+xml"), "svg");
        assert_eq!(extension_for_mime("image/x-icon"), "jpg");
    }
}

use anyhow::{anyhow, Result};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Output format of a stored image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
}

impl OutputFormat {
    /// Format for a canonical extension. `None` for formats without a raster
    /// encoder (svg) and unknown extensions.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            "gif" => Some(OutputFormat::Gif),
            "bmp" => Some(OutputFormat::Bmp),
            _ => None,
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Bmp => "image/bmp",
        }
    }
}

/// Encodes decoded images into their storage format
pub struct ImageEncoder;

impl ImageEncoder {
    /// Encode `img` as `format`. `quality` (1-100) applies to JPEG and WebP; the
    /// other formats are lossless and ignore it.
    pub fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        let quality = quality.clamp(1, 100);
        match format {
            OutputFormat::Jpeg => Self::encode_jpeg(img, quality),
            OutputFormat::WebP => Self::encode_webp(img, quality),
            OutputFormat::Png => Self::write_with_image(img, ImageFormat::Png),
            OutputFormat::Gif => {
                // The GIF encoder only takes RGBA
                Self::write_with_image(&DynamicImage::ImageRgba8(img.to_rgba8()), ImageFormat::Gif)
            }
            OutputFormat::Bmp => {
                Self::write_with_image(&DynamicImage::ImageRgba8(img.to_rgba8()), ImageFormat::Bmp)
            }
        }
    }

    /// Encode to JPEG using mozjpeg
    fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }

    fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality as f32);

        if webp_data.is_empty() {
            return Err(anyhow!("WebP encoder produced no data"));
        }

        Ok(webp_data.to_vec())
    }

    fn write_with_image(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), format)?;
        Ok(buffer)
    }
}

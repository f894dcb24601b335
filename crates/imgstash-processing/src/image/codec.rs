//! Codec seam between the save pipeline and the pixel work.

use super::encoder::{ImageEncoder, OutputFormat};
use super::orientation::ImageOrientation;
use super::resize::{ResizeDimensions, MAX_OUTPUT_PIXELS};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("No encoder for format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode image as {format}: {message}")]
    Encode { format: String, message: String },

    #[error("Resize to {width}x{height} exceeds the {max_pixels} pixel limit")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },
}

/// Decode, transform and encode operations the pipeline needs.
///
/// Implementations are CPU-bound and are called from blocking threads.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Correct orientation using metadata embedded in `data`, the bytes `img`
    /// was decoded from.
    fn orient(&self, img: DynamicImage, data: &[u8]) -> DynamicImage;

    /// Aspect-preserving resize to fit within the given bound(s)
    fn scale(
        &self,
        img: DynamicImage,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<DynamicImage, CodecError>;

    /// Exact resize; a missing side keeps its current size
    fn resize(
        &self,
        img: DynamicImage,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<DynamicImage, CodecError>;

    fn encode(&self, img: &DynamicImage, extension: &str, quality: u8)
        -> Result<Vec<u8>, CodecError>;

    fn dimensions(&self, img: &DynamicImage) -> (u32, u32) {
        img.dimensions()
    }
}

/// Raster codec backed by `image`, `mozjpeg`, `webp` and `kamadak-exif`
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, CodecError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        if reader.format().is_none() {
            return Err(CodecError::Decode("unrecognized image format".to_string()));
        }

        reader.decode().map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn orient(&self, img: DynamicImage, data: &[u8]) -> DynamicImage {
        ImageOrientation::apply_exif_orientation(img, data)
    }

    fn scale(
        &self,
        img: DynamicImage,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<DynamicImage, CodecError> {
        let source = img.dimensions();
        let target = ResizeDimensions::fit_within(source, width, height)
            .ensure_within(source, MAX_OUTPUT_PIXELS)?;
        Ok(target.apply(img))
    }

    fn resize(
        &self,
        img: DynamicImage,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<DynamicImage, CodecError> {
        let source = img.dimensions();
        let target = ResizeDimensions::exact(source, width, height)
            .ensure_within(source, MAX_OUTPUT_PIXELS)?;
        Ok(target.apply(img))
    }

    fn encode(
        &self,
        img: &DynamicImage,
        extension: &str,
        quality: u8,
    ) -> Result<Vec<u8>, CodecError> {
        let format = OutputFormat::from_extension(extension)
            .ok_or_else(|| CodecError::UnsupportedFormat(extension.to_string()))?;

        ImageEncoder::encode(img, format, quality).map_err(|e| CodecError::Encode {
            format: extension.to_string(),
            message: e.to_string(),
        })
    }
}

//! Resize geometry

use super::codec::CodecError;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Largest resample buffer, in pixels. Lanczos resampling keeps an RGBA `f32`
/// intermediate (16 bytes per pixel), held to the default `image::Limits`
/// allocation ceiling of 512 MiB.
pub const MAX_OUTPUT_PIXELS: u64 = 512 * 1024 * 1024 / 16;

/// Target size of a resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDimensions {
    pub width: u32,
    pub height: u32,
}

impl ResizeDimensions {
    /// Largest size with the source's aspect ratio that fits within the given
    /// bound(s). Upscales when the bounds are larger than the source.
    pub fn fit_within(
        source: (u32, u32),
        width: Option<u32>,
        height: Option<u32>,
    ) -> ResizeDimensions {
        let (src_w, src_h) = source;
        let scale_w = width.map(|w| w as f64 / src_w as f64);
        let scale_h = height.map(|h| h as f64 / src_h as f64);

        let (out_w, out_h) = match (scale_w, scale_h) {
            (Some(sw), Some(sh)) if sw <= sh => (width.unwrap_or(src_w), scaled(src_h, sw)),
            (Some(_), Some(sh)) => (scaled(src_w, sh), height.unwrap_or(src_h)),
            (Some(sw), None) => (width.unwrap_or(src_w), scaled(src_h, sw)),
            (None, Some(sh)) => (scaled(src_w, sh), height.unwrap_or(src_h)),
            (None, None) => (src_w, src_h),
        };

        ResizeDimensions {
            width: out_w.max(1),
            height: out_h.max(1),
        }
    }

    /// Exact size; a missing side keeps the source's size.
    pub fn exact(source: (u32, u32), width: Option<u32>, height: Option<u32>) -> ResizeDimensions {
        ResizeDimensions {
            width: width.unwrap_or(source.0).max(1),
            height: height.unwrap_or(source.1).max(1),
        }
    }

    /// Reject targets whose buffers would exceed `max_pixels`.
    ///
    /// Resampling `source` allocates the output plus a `source.0 x height`
    /// intermediate, so both are checked. A target equal to `source` needs
    /// no resample and always passes.
    pub fn ensure_within(self, source: (u32, u32), max_pixels: u64) -> Result<Self, CodecError> {
        if source == (self.width, self.height) {
            return Ok(self);
        }

        let output = u64::from(self.width).checked_mul(u64::from(self.height));
        let intermediate = u64::from(source.0).checked_mul(u64::from(self.height));

        match (output, intermediate) {
            (Some(output), Some(intermediate)) if output <= max_pixels && intermediate <= max_pixels => {
                Ok(self)
            }
            _ => Err(CodecError::TooLarge {
                width: self.width,
                height: self.height,
                max_pixels,
            }),
        }
    }

    /// Resample `img` to these dimensions. Returns it untouched when the size
    /// already matches.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        if img.dimensions() == (self.width, self.height) {
            return img;
        }
        img.resize_exact(self.width, self.height, FilterType::Lanczos3)
    }
}

fn scaled(side: u32, factor: f64) -> u32 {
    (side as f64 * factor).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn dims(width: u32, height: u32) -> ResizeDimensions {
        ResizeDimensions { width, height }
    }

    #[test]
    fn test_fit_width_only() {
        assert_eq!(ResizeDimensions::fit_within((200, 100), Some(100), None), dims(100, 50));
        assert_eq!(ResizeDimensions::fit_within((3, 2), Some(100), None), dims(100, 67));
    }

    #[test]
    fn test_fit_height_only() {
        assert_eq!(ResizeDimensions::fit_within((200, 100), None, Some(50)), dims(100, 50));
    }

    #[test]
    fn test_fit_both_bounds_uses_tighter_one() {
        assert_eq!(
            ResizeDimensions::fit_within((200, 100), Some(100), Some(100)),
            dims(100, 50)
        );
        assert_eq!(
            ResizeDimensions::fit_within((100, 200), Some(100), Some(100)),
            dims(50, 100)
        );
    }

    #[test]
    fn test_fit_upscales() {
        assert_eq!(
            ResizeDimensions::fit_within((1, 1), Some(100), Some(100)),
            dims(100, 100)
        );
    }

    #[test]
    fn test_fit_never_collapses_to_zero() {
        assert_eq!(ResizeDimensions::fit_within((1000, 1), Some(10), None), dims(10, 1));
    }

    #[test]
    fn test_exact() {
        assert_eq!(ResizeDimensions::exact((200, 100), Some(100), Some(100)), dims(100, 100));
        assert_eq!(ResizeDimensions::exact((200, 100), Some(30), None), dims(30, 100));
    }

    #[test]
    fn test_ensure_within_rejects_oversized_targets() {
        let huge = ResizeDimensions::exact((1, 1), Some(100_000), Some(100_000));
        assert!(matches!(
            huge.ensure_within((1, 1), MAX_OUTPUT_PIXELS),
            Err(CodecError::TooLarge { width: 100_000, height: 100_000, .. })
        ));

        let fitted = ResizeDimensions::fit_within((1, 1), Some(100_000), None);
        assert!(fitted.ensure_within((1, 1), MAX_OUTPUT_PIXELS).is_err());

        assert!(dims(100, 100).ensure_within((1, 1), MAX_OUTPUT_PIXELS).is_ok());
    }

    #[test]
    fn test_ensure_within_checks_intermediate_buffer() {
        // 10-pixel output, but the 10-wide source is first resampled to 10 rows
        assert!(dims(1, 10).ensure_within((10, 1), 100).is_ok());
        assert!(dims(1, 10).ensure_within((10, 1), 50).is_err());
    }

    #[test]
    fn test_ensure_within_passes_unchanged_size() {
        assert!(dims(4, 2).ensure_within((4, 2), 1).is_ok());
    }

    #[test]
    fn test_apply() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255])));
        assert_eq!(dims(8, 8).apply(img.clone()).dimensions(), (8, 8));
        assert_eq!(dims(4, 2).apply(img).dimensions(), (4, 2));
    }
}

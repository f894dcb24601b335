//! Image codec
//!
//! - Decoding, orientation, resizing and encoding behind the [`ImageCodec`] trait
//! - EXIF orientation correction (orientation)
//! - Scale and exact resize geometry (resize)
//! - Per-format encoders (encoder)

pub mod codec;
pub mod encoder;
pub mod orientation;
pub mod resize;

pub use codec::{CodecError, ImageCodec, RasterCodec};
pub use encoder::{ImageEncoder, OutputFormat};
pub use orientation::ImageOrientation;
pub use resize::ResizeDimensions;

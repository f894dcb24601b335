//! Imgstash Processing Library
//!
//! The save pipeline: a base64 payload goes through the [`decoder`], the
//! [`inspector`] and the [`namer`], then the [`ImageManager`] decodes, transforms,
//! re-encodes and writes it to a disk.
//!
//! ```no_run
//! use imgstash_core::{ImageConfig, SaveRequest};
//! use imgstash_processing::ImageManager;
//!
//! # async fn run(payload: String) -> anyhow::Result<()> {
//! let manager = ImageManager::from_config(ImageConfig::from_env()?).await?;
//! let saved = manager.save(SaveRequest::new(payload).width(800)).await?;
//! println!("{}", saved.url);
//! # Ok(())
//! # }
//! ```

pub mod decoder;
pub mod image;
pub mod inspector;
pub mod manager;
pub mod namer;

pub use self::image::{CodecError, ImageCodec, RasterCodec};
pub use inspector::Inspection;
pub use manager::ImageManager;

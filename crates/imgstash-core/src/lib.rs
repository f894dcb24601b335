//! Imgstash Core Library
//!
//! This crate provides the configuration, error taxonomy and request/result models
//! shared by the storage, processing and CLI crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{DiskConfig, ImageConfig};
pub use error::{ErrorKind, ErrorMetadata, LogLevel, SaveError};
pub use models::{Dimensions, SaveRequest, SaveResult};
pub use storage_types::StorageDriver;

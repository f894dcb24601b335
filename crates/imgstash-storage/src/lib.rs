//! Imgstash Storage Library
//!
//! This crate provides the storage abstraction the image pipeline writes to.
//! A *disk* is a named backend (local filesystem, S3 bucket or in-memory store);
//! objects inside a disk are addressed by a relative path such as `uploads/abc.png`.
//!
//! # Path format
//!
//! Paths are `{location}/{filename}`. They must not contain `..` or start with `/`.
//! Path handling is centralized in the `keys` module so all backends stay consistent.

pub mod disks;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use disks::Disks;
pub use factory::create_disks;
pub use imgstash_core::StorageDriver;
pub use keys::object_path;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use object::ObjectStorage;
pub use traits::{Storage, StorageError, StorageResult};

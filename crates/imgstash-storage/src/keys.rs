//! Shared path handling for storage backends.
//!
//! Path format: `{location}/{filename}`, or just `{filename}` when the location is empty.

use crate::traits::{StorageError, StorageResult};

/// Build the object path for a file inside a location.
///
/// Leading and trailing slashes on `location` are ignored, so `/uploads/` and
/// `uploads` address the same objects.
pub fn object_path(location: &str, filename: &str) -> String {
    let location = location.trim_matches('/');
    if location.is_empty() {
        filename.to_string()
    } else {
        format!("{}/{}", location, filename)
    }
}

/// Reject paths that could escape the disk root.
///
/// Only whole `..` segments are traversal; `my..photo.png` is a valid name.
pub fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|segment| segment == "..")
    {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

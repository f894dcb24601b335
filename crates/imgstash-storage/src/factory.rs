#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Disks, ObjectStorage, Storage, StorageDriver, StorageError, StorageResult};
use imgstash_core::{DiskConfig, ImageConfig};
use std::sync::Arc;

/// Build every disk declared in the configuration
pub async fn create_disks(config: &ImageConfig) -> StorageResult<Disks> {
    let mut disks = Disks::new();
    for disk in &config.disks {
        let storage = create_storage(disk).await?;
        tracing::debug!(disk = %disk.name, driver = %disk.driver, "Disk configured");
        disks.insert(disk.name.clone(), storage);
    }
    Ok(disks)
}

/// Create a storage backend for a single disk
pub async fn create_storage(disk: &DiskConfig) -> StorageResult<Arc<dyn Storage>> {
    match disk.driver {
        #[cfg(feature = "storage-local")]
        StorageDriver::Local => {
            let root = disk.root.clone().ok_or_else(|| {
                StorageError::ConfigError(format!("Disk '{}' has no root directory", disk.name))
            })?;
            let base_url = disk
                .url
                .clone()
                .unwrap_or_else(|| format!("/storage/{}", disk.name));

            let storage = LocalStorage::new(root, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageDriver::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        StorageDriver::S3 => {
            let bucket = disk.bucket.clone().ok_or_else(|| {
                StorageError::ConfigError(format!("Disk '{}' has no bucket", disk.name))
            })?;
            let region = disk.region.clone().ok_or_else(|| {
                StorageError::ConfigError(format!("Disk '{}' has no region", disk.name))
            })?;

            let storage =
                ObjectStorage::s3(bucket, region, disk.endpoint.clone(), disk.url.clone())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageDriver::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        StorageDriver::Memory => Ok(Arc::new(ObjectStorage::in_memory(
            disk.name.clone(),
            disk.url.clone(),
        ))),
    }
}

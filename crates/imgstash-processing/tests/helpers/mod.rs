#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use imgstash_core::{DiskConfig, ImageConfig};
use imgstash_processing::ImageManager;
use imgstash_storage::{Disks, ObjectStorage, Storage, StorageDriver, StorageError, StorageResult};
use std::sync::Arc;

pub const PUBLIC_URL: &str = "http://localhost/storage";

/// Manager over an in-memory "public" disk plus a "custom" disk
pub struct TestManager {
    pub manager: ImageManager,
    pub public: ObjectStorage,
    pub custom: ObjectStorage,
}

pub fn test_config() -> ImageConfig {
    ImageConfig {
        disks: vec![DiskConfig::memory("public"), DiskConfig::memory("custom")],
        ..Default::default()
    }
}

pub fn setup_manager() -> TestManager {
    setup_manager_with_config(test_config())
}

pub fn setup_manager_with_config(config: ImageConfig) -> TestManager {
    let public = ObjectStorage::in_memory("public", Some(PUBLIC_URL.to_string()));
    let custom = ObjectStorage::in_memory("custom", Some("http://cdn.test/custom".to_string()));

    let disks = Disks::new()
        .with_disk("public", Arc::new(public.clone()))
        .with_disk("custom", Arc::new(custom.clone()));

    TestManager {
        manager: ImageManager::new(config, disks),
        public,
        custom,
    }
}

/// Manager whose default disk fails every write
pub fn setup_failing_manager() -> ImageManager {
    let disks = Disks::new().with_disk("public", Arc::new(FailingStorage));
    ImageManager::new(test_config(), disks)
}

/// Manager whose default disk reports every path as taken
pub fn setup_crowded_manager() -> (ImageManager, ObjectStorage) {
    let backing = ObjectStorage::in_memory("public", Some(PUBLIC_URL.to_string()));
    let disks = Disks::new().with_disk(
        "public",
        Arc::new(CrowdedStorage {
            inner: backing.clone(),
        }),
    );
    (ImageManager::new(test_config(), disks), backing)
}

/// Disk that rejects writes and deletes
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn put(&self, path: &str, _data: Vec<u8>, _content_type: &str) -> StorageResult<()> {
        Err(StorageError::UploadFailed(format!("disk full while writing {}", path)))
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, _path: &str) -> StorageResult<bool> {
        Err(StorageError::DeleteFailed("backend unavailable".to_string()))
    }

    async fn exists(&self, _path: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn url(&self, path: &str) -> StorageResult<String> {
        Ok(format!("{}/{}", PUBLIC_URL, path))
    }

    fn backend_type(&self) -> StorageDriver {
        StorageDriver::Memory
    }
}

/// Disk where every existence check hits, forcing the naming fallback
pub struct CrowdedStorage {
    inner: ObjectStorage,
}

#[async_trait]
impl Storage for CrowdedStorage {
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        self.inner.put(path, data, content_type).await
    }

    async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.inner.get(path).await
    }

    async fn delete(&self, path: &str) -> StorageResult<bool> {
        self.inner.delete(path).await
    }

    async fn exists(&self, _path: &str) -> StorageResult<bool> {
        Ok(true)
    }

    fn url(&self, path: &str) -> StorageResult<String> {
        self.inner.url(path)
    }

    fn backend_type(&self) -> StorageDriver {
        StorageDriver::Memory
    }
}

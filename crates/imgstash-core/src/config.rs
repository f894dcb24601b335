//! Configuration module
//!
//! Process-wide settings for the save pipeline and the storage disks it writes to.
//! Loaded once at startup and passed explicitly to the components that need it.

use std::collections::HashMap;
use std::env;

use crate::storage_types::StorageDriver;

const DEFAULT_DISK: &str = "public";
const DEFAULT_LOCATION: &str = "uploads";
const MAX_SIZE_KB: u64 = 5120;
const SUPPORTED_TYPES: &str = "jpg,jpeg,png,webp,gif,bmp,svg";
const QUALITY: u8 = 90;
const AUTO_ORIENT: bool = true;
const FILENAME_LENGTH: usize = 45;
const FILENAME_MAX_ATTEMPTS: usize = 5;

/// A named storage disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskConfig {
    pub name: String,
    pub driver: StorageDriver,
    /// Root directory for local disks
    pub root: Option<String>,
    /// Public base URL; object paths are appended to it
    pub url: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint: Option<String>,
}

impl DiskConfig {
    /// A local disk rooted at `root`.
    pub fn local(name: impl Into<String>, root: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: StorageDriver::Local,
            root: Some(root.into()),
            url: Some(url.into()),
            bucket: None,
            region: None,
            endpoint: None,
        }
    }

    /// An in-memory disk, mostly useful for tests and dry runs.
    pub fn memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: StorageDriver::Memory,
            root: None,
            url: None,
            bucket: None,
            region: None,
            endpoint: None,
        }
    }
}

/// Image pipeline configuration
#[derive(Clone, Debug)]
pub struct ImageConfig {
    pub default_disk: String,
    pub default_location: String,
    /// Size ceiling of the decoded payload, in KB
    pub max_size_kb: u64,
    pub supported_types: Vec<String>,
    pub quality: u8,
    pub auto_orient: bool,
    pub filename_length: usize,
    pub filename_max_attempts: usize,
    pub disks: Vec<DiskConfig>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_disk: DEFAULT_DISK.to_string(),
            default_location: DEFAULT_LOCATION.to_string(),
            max_size_kb: MAX_SIZE_KB,
            supported_types: parse_list(SUPPORTED_TYPES),
            quality: QUALITY,
            auto_orient: AUTO_ORIENT,
            filename_length: FILENAME_LENGTH,
            filename_max_attempts: FILENAME_MAX_ATTEMPTS,
            disks: vec![DiskConfig::local(
                DEFAULT_DISK,
                format!("storage/{}", DEFAULT_DISK),
                "http://localhost/storage",
            )],
        }
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ImageConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_disk = lookup("BASE64_IMAGE_DISK").unwrap_or_else(|| DEFAULT_DISK.to_string());

        let disk_names = lookup("BASE64_IMAGE_DISKS")
            .map(|s| s.split(',').map(|n| n.trim().to_string()).filter(|n| !n.is_empty()).collect())
            .unwrap_or_else(|| vec![default_disk.clone()]);

        let mut disks = Vec::with_capacity(disk_names.len());
        for name in disk_names {
            disks.push(disk_from_lookup(&name, &lookup)?);
        }

        let config = ImageConfig {
            default_disk,
            default_location: lookup("BASE64_IMAGE_LOCATION")
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            max_size_kb: lookup("BASE64_IMAGE_MAX_SIZE")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(MAX_SIZE_KB),
            supported_types: parse_list(
                &lookup("BASE64_IMAGE_SUPPORTED_TYPES").unwrap_or_else(|| SUPPORTED_TYPES.to_string()),
            ),
            quality: lookup("BASE64_IMAGE_QUALITY")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(QUALITY),
            auto_orient: lookup("BASE64_IMAGE_AUTO_ORIENT")
                .and_then(|s| s.trim().to_lowercase().parse().ok())
                .unwrap_or(AUTO_ORIENT),
            filename_length: lookup("BASE64_IMAGE_FILENAME_LENGTH")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(FILENAME_LENGTH),
            filename_max_attempts: lookup("BASE64_IMAGE_FILENAME_MAX_ATTEMPTS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(FILENAME_MAX_ATTEMPTS),
            disks,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(1..=100).contains(&self.quality) {
            return Err(anyhow::anyhow!(
                "BASE64_IMAGE_QUALITY must be between 1 and 100"
            ));
        }

        if self.max_size_kb == 0 {
            return Err(anyhow::anyhow!("BASE64_IMAGE_MAX_SIZE must be greater than 0"));
        }

        if self.filename_length == 0 {
            return Err(anyhow::anyhow!(
                "BASE64_IMAGE_FILENAME_LENGTH must be greater than 0"
            ));
        }

        if self.supported_types.is_empty() {
            return Err(anyhow::anyhow!(
                "BASE64_IMAGE_SUPPORTED_TYPES must list at least one extension"
            ));
        }

        if self.disk(&self.default_disk).is_none() {
            return Err(anyhow::anyhow!(
                "Default disk '{}' is not declared in BASE64_IMAGE_DISKS",
                self.default_disk
            ));
        }

        for disk in &self.disks {
            if disk.driver == StorageDriver::S3 {
                if disk.bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "Disk '{}' uses the s3 driver but has no bucket",
                        disk.name
                    ));
                }
                if disk.region.is_none() {
                    return Err(anyhow::anyhow!(
                        "Disk '{}' uses the s3 driver but has no region",
                        disk.name
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn disk(&self, name: &str) -> Option<&DiskConfig> {
        self.disks.iter().find(|d| d.name == name)
    }

    pub fn max_size_bytes(&self) -> usize {
        (self.max_size_kb as usize).saturating_mul(1024)
    }

    /// Whether `extension` is in the allow-list, ignoring case.
    pub fn is_supported(&self, extension: &str) -> bool {
        self.supported_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(extension))
    }

    /// Snapshot of the effective settings, for startup logging.
    pub fn summary(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("default_disk", self.default_disk.clone()),
            ("default_location", self.default_location.clone()),
            ("max_size_kb", self.max_size_kb.to_string()),
            ("supported_types", self.supported_types.join(",")),
            ("quality", self.quality.to_string()),
            ("auto_orient", self.auto_orient.to_string()),
            (
                "disks",
                self.disks
                    .iter()
                    .map(|d| format!("{}:{}", d.name, d.driver))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        ])
    }
}

fn disk_from_lookup<F>(name: &str, lookup: &F) -> Result<DiskConfig, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("DISK_{}", name.to_uppercase().replace('-', "_"));
    let get = |suffix: &str| {
        lookup(&format!("{}_{}", prefix, suffix)).filter(|s| !s.trim().is_empty())
    };

    let driver = match get("DRIVER") {
        Some(s) => s.parse::<StorageDriver>()?,
        None => StorageDriver::Local,
    };

    let root = match driver {
        StorageDriver::Local => Some(get("ROOT").unwrap_or_else(|| format!("storage/{}", name))),
        _ => get("ROOT"),
    };

    Ok(DiskConfig {
        name: name.to_string(),
        driver,
        root,
        url: get("URL"),
        bucket: get("BUCKET"),
        region: get("REGION").or_else(|| lookup("AWS_REGION")),
        endpoint: get("ENDPOINT"),
    })
}

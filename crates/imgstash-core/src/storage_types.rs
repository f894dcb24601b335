use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage driver types
///
/// Selects which backend a configured disk is built on. Defined in core because
/// it is part of the disk configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    Local,
    S3,
    Memory,
}

impl FromStr for StorageDriver {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(StorageDriver::Local),
            "s3" => Ok(StorageDriver::S3),
            "memory" => Ok(StorageDriver::Memory),
            _ => Err(anyhow::anyhow!("Invalid storage driver: {}", s)),
        }
    }
}

impl Display for StorageDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageDriver::Local => write!(f, "local"),
            StorageDriver::S3 => write!(f, "s3"),
            StorageDriver::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_driver() {
        assert_eq!("local".parse::<StorageDriver>().unwrap(), StorageDriver::Local);
        assert_eq!("S3".parse::<StorageDriver>().unwrap(), StorageDriver::S3);
        assert_eq!(" memory ".parse::<StorageDriver>().unwrap(), StorageDriver::Memory);
        assert!("nfs".parse::<StorageDriver>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for driver in [StorageDriver::Local, StorageDriver::S3, StorageDriver::Memory] {
            assert_eq!(driver.to_string().parse::<StorageDriver>().unwrap(), driver);
        }
    }
}

//! Request and result models for the save pipeline

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input to a single save call.
///
/// Only `base64` is required. Every `None` falls back to the process-wide
/// [`ImageConfig`](crate::ImageConfig) value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SaveRequest {
    /// Base64 payload, optionally prefixed with `data:image/<subtype>;base64,`
    pub base64: String,
    pub disk: Option<String>,
    pub location: Option<String>,
    /// Suggested base name; its extension is replaced by the detected one
    pub filename: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub quality: Option<u8>,
    #[validate(range(min = 1))]
    pub width: Option<u32>,
    #[validate(range(min = 1))]
    pub height: Option<u32>,
    #[serde(default = "default_maintain_aspect_ratio")]
    pub maintain_aspect_ratio: bool,
    /// Per-call override of the configured size ceiling, in KB
    #[validate(range(min = 1))]
    pub max_size_kb: Option<u64>,
    pub auto_orient: Option<bool>,
}

fn default_maintain_aspect_ratio() -> bool {
    true
}

impl SaveRequest {
    pub fn new(base64: impl Into<String>) -> Self {
        Self {
            base64: base64.into(),
            maintain_aspect_ratio: true,
            ..Default::default()
        }
    }

    pub fn disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = Some(disk.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn maintain_aspect_ratio(mut self, maintain: bool) -> Self {
        self.maintain_aspect_ratio = maintain;
        self
    }

    pub fn max_size_kb(mut self, max_size_kb: u64) -> Self {
        self.max_size_kb = Some(max_size_kb);
        self
    }

    pub fn auto_orient(mut self, auto_orient: bool) -> Self {
        self.auto_orient = Some(auto_orient);
        self
    }

    /// Whether any resize was requested.
    pub fn wants_resize(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

/// Pixel dimensions of the stored image (after any resize)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Metadata about a stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResult {
    pub success: bool,
    /// `location/filename` within the disk
    pub path: String,
    pub filename: String,
    pub url: String,
    /// Length of the encoded payload that was written
    pub size_bytes: usize,
    pub mime_type: String,
    pub extension: String,
    pub dimensions: Dimensions,
}

//! Save and delete entry points
//!
//! [`ImageManager::save`] runs the pipeline stages strictly in order:
//! decode, inspect, name, then transform and persist. The final storage write is
//! the only side effect, so a failure at any earlier point leaves nothing behind.

use crate::decoder;
use crate::image::{CodecError, ImageCodec, RasterCodec};
use crate::inspector::{self, Inspection};
use crate::namer::{self, NamingPolicy};
use image::DynamicImage;
use imgstash_core::{
    Dimensions, ErrorMetadata, ImageConfig, LogLevel, SaveError, SaveRequest, SaveResult,
};
use imgstash_storage::{create_disks, object_path, Disks, Storage};
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

/// Effective transform settings for one save
#[derive(Debug, Clone)]
struct TransformPlan {
    extension: &'static str,
    quality: u8,
    auto_orient: bool,
    resize: bool,
    width: Option<u32>,
    height: Option<u32>,
    maintain_aspect_ratio: bool,
}

struct Transformed {
    data: Vec<u8>,
    dimensions: Dimensions,
}

/// Saves base64 images to configured disks and deletes them again
#[derive(Clone)]
pub struct ImageManager {
    config: ImageConfig,
    disks: Arc<Disks>,
    codec: Arc<dyn ImageCodec>,
}

impl ImageManager {
    pub fn new(config: ImageConfig, disks: Disks) -> Self {
        Self::with_codec(config, disks, Arc::new(RasterCodec))
    }

    pub fn with_codec(config: ImageConfig, disks: Disks, codec: Arc<dyn ImageCodec>) -> Self {
        Self {
            config,
            disks: Arc::new(disks),
            codec,
        }
    }

    /// Validate `config` and build every disk it declares.
    pub async fn from_config(config: ImageConfig) -> Result<Self, anyhow::Error> {
        config.validate()?;
        let disks = create_disks(&config).await?;

        tracing::info!(
            default_disk = %config.default_disk,
            disks = ?disks.names(),
            "Image manager initialized"
        );

        Ok(Self::new(config, disks))
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    pub fn disks(&self) -> &Disks {
        &self.disks
    }

    /// Decode, validate, transform and store a base64 image.
    ///
    /// Any error means nothing was stored.
    pub async fn save(&self, request: SaveRequest) -> Result<SaveResult, SaveError> {
        let start = Instant::now();
        let result = self.run_save(request).await;

        match &result {
            Ok(saved) => tracing::info!(
                path = %saved.path,
                mime_type = %saved.mime_type,
                size_bytes = saved.size_bytes,
                width = saved.dimensions.width,
                height = saved.dimensions.height,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Image saved"
            ),
            Err(e) => log_save_failure(e),
        }

        result
    }

    async fn run_save(&self, request: SaveRequest) -> Result<SaveResult, SaveError> {
        request.validate()?;

        let max_bytes = match request.max_size_kb {
            Some(kb) => (kb as usize).saturating_mul(1024),
            None => self.config.max_size_bytes(),
        };
        let bytes = decoder::decode(&request.base64, max_bytes)?;

        let Inspection {
            mime_type,
            extension,
        } = inspector::inspect(&bytes, &self.config)?;

        let disk_name = request
            .disk
            .clone()
            .unwrap_or_else(|| self.config.default_disk.clone());
        let storage = self
            .disks
            .disk(&disk_name)
            .map_err(|e| SaveError::InvalidInput(e.to_string()))?;

        let location = request
            .location
            .clone()
            .unwrap_or_else(|| self.config.default_location.clone());

        let filename = namer::resolve_filename(
            storage.as_ref(),
            &location,
            request.filename.as_deref(),
            extension,
            NamingPolicy {
                length: self.config.filename_length,
                max_attempts: self.config.filename_max_attempts,
            },
        )
        .await?;

        let plan = TransformPlan {
            extension,
            quality: request.quality.unwrap_or(self.config.quality),
            auto_orient: request.auto_orient.unwrap_or(self.config.auto_orient),
            resize: request.wants_resize(),
            width: request.width,
            height: request.height,
            maintain_aspect_ratio: request.maintain_aspect_ratio,
        };

        let path = object_path(&location, &filename);
        let transformed = self.transform(bytes, plan).await?;

        // Resolved before the write so the write stays the last step
        let url = storage.url(&path).map_err(SaveError::processing_failed)?;

        persist(storage.as_ref(), &path, &transformed.data, extension).await?;

        Ok(SaveResult {
            success: true,
            path,
            filename,
            url,
            size_bytes: transformed.data.len(),
            mime_type,
            extension: extension.to_string(),
            dimensions: transformed.dimensions,
        })
    }

    /// Run the codec work on the blocking pool
    async fn transform(&self, bytes: Vec<u8>, plan: TransformPlan) -> Result<Transformed, SaveError> {
        let codec = Arc::clone(&self.codec);

        tokio::task::spawn_blocking(move || transform_blocking(codec.as_ref(), &bytes, &plan))
            .await
            .map_err(SaveError::processing_failed)?
    }

    /// Delete the object at `path` on `disk` (default disk when `None`).
    ///
    /// Returns whether an object was removed. Never fails: unknown disks and
    /// backend errors are logged and reported as `false`.
    pub async fn delete(&self, path: &str, disk: Option<&str>) -> bool {
        let disk_name = disk.unwrap_or(self.config.default_disk.as_str());

        let storage = match self.disks.disk(disk_name) {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!(disk = %disk_name, path = %path, error = %e, "Delete failed");
                return false;
            }
        };

        match storage.delete(path).await {
            Ok(removed) => {
                tracing::debug!(disk = %disk_name, path = %path, removed = removed, "Delete finished");
                removed
            }
            Err(e) => {
                tracing::warn!(disk = %disk_name, path = %path, error = %e, "Delete failed");
                false
            }
        }
    }
}

fn transform_blocking(
    codec: &dyn ImageCodec,
    bytes: &[u8],
    plan: &TransformPlan,
) -> Result<Transformed, SaveError> {
    let mut img: DynamicImage = codec
        .decode(bytes)
        .map_err(|e| SaveError::processing_failed(SaveError::InvalidImage(e.to_string())))?;

    if plan.auto_orient {
        img = codec.orient(img, bytes);
    }

    if plan.resize {
        let resized = if plan.maintain_aspect_ratio {
            codec.scale(img, plan.width, plan.height)
        } else {
            codec.resize(img, plan.width, plan.height)
        };
        img = resized.map_err(|e| match e {
            CodecError::TooLarge { .. } => SaveError::InvalidInput(e.to_string()),
            other => SaveError::processing_failed(other),
        })?;
    }

    let data = codec
        .encode(&img, plan.extension, plan.quality)
        .map_err(SaveError::processing_failed)?;

    let (width, height) = codec.dimensions(&img);

    Ok(Transformed {
        data,
        dimensions: Dimensions { width, height },
    })
}

async fn persist(
    storage: &dyn Storage,
    path: &str,
    data: &[u8],
    extension: &str,
) -> Result<(), SaveError> {
    let content_type = crate::image::OutputFormat::from_extension(extension)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");

    storage
        .put(path, data.to_vec(), content_type)
        .await
        .map_err(|e| SaveError::processing_failed(SaveError::StorageWriteError(e.to_string())))
}

fn log_save_failure(err: &SaveError) {
    let code = err.error_code();
    let details = err.detailed_message();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error_code = code, error = %details, "Image save rejected"),
        LogLevel::Warn => tracing::warn!(error_code = code, error = %details, "Image save rejected"),
        LogLevel::Error => tracing::error!(error_code = code, error = %details, "Image save failed"),
    }
}

//! Error types module
//!
//! Every failure of the save pipeline is reported as a [`SaveError`]. Callers can match
//! on the variant directly, or on its [`ErrorKind`] when they only care about the
//! category. Any `SaveError` means nothing was stored.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected but well-formed payloads
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - lets errors describe how they should be presented
pub trait ErrorMetadata {
    /// HTTP status code an outer surface should use
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "PAYLOAD_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Failure category of a [`SaveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    DecodeError,
    PayloadTooLarge,
    InvalidImage,
    UnsupportedType,
    StorageWriteError,
    ProcessingFailed,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid base64 image data: {0}")]
    DecodeError(String),

    #[error("Image size exceeds maximum allowed size: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Failed to save image to storage: {0}")]
    StorageWriteError(String),

    #[error("Image processing failed: {message}")]
    ProcessingFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl SaveError {
    /// Wrap a failure from the transform/persist stage.
    pub fn processing_failed(err: impl Into<anyhow::Error>) -> Self {
        let source = err.into();
        SaveError::ProcessingFailed {
            message: source.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SaveError::InvalidInput(_) => ErrorKind::InvalidInput,
            SaveError::DecodeError(_) => ErrorKind::DecodeError,
            SaveError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            SaveError::InvalidImage(_) => ErrorKind::InvalidImage,
            SaveError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            SaveError::StorageWriteError(_) => ErrorKind::StorageWriteError,
            SaveError::ProcessingFailed { .. } => ErrorKind::ProcessingFailed,
        }
    }

    /// Kind of the error wrapped by `ProcessingFailed`, when that cause is itself a
    /// `SaveError` (e.g. `InvalidImage` raised by the full decoder, or
    /// `StorageWriteError` raised by the final write).
    pub fn cause_kind(&self) -> Option<ErrorKind> {
        match self {
            SaveError::ProcessingFailed { source, .. } => {
                source.downcast_ref::<SaveError>().map(SaveError::kind)
            }
            _ => None,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl From<validator::ValidationErrors> for SaveError {
    fn from(err: validator::ValidationErrors) -> Self {
        SaveError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn save_error_static_metadata(err: &SaveError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        SaveError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        SaveError::DecodeError(_) => (400, "DECODE_ERROR", false, LogLevel::Debug),
        SaveError::PayloadTooLarge { .. } => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        SaveError::InvalidImage(_) => (400, "INVALID_IMAGE", false, LogLevel::Warn),
        SaveError::UnsupportedType(_) => (415, "UNSUPPORTED_TYPE", false, LogLevel::Warn),
        SaveError::StorageWriteError(_) => (500, "STORAGE_WRITE_ERROR", true, LogLevel::Error),
        SaveError::ProcessingFailed { .. } => (500, "PROCESSING_FAILED", false, LogLevel::Error),
    }
}

impl ErrorMetadata for SaveError {
    fn http_status_code(&self) -> u16 {
        save_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        save_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        save_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        save_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            SaveError::InvalidInput(ref msg) => msg.clone(),
            SaveError::DecodeError(_) => "Invalid base64 image data".to_string(),
            SaveError::PayloadTooLarge { .. } => {
                "Image size exceeds maximum allowed size".to_string()
            }
            SaveError::InvalidImage(_) => "Invalid image data".to_string(),
            SaveError::UnsupportedType(ref ext) => format!("Unsupported image type: {}", ext),
            SaveError::StorageWriteError(_) => "Failed to save image to storage".to_string(),
            SaveError::ProcessingFailed { ref message, .. } => {
                format!("Image processing failed: {}", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_payload_too_large() {
        let err = SaveError::PayloadTooLarge {
            size: 2048,
            max: 1024,
        };
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert!(err.to_string().contains("2048"));
        assert!(err.to_string().contains("1024"));
    }

    #[test]
    fn test_error_metadata_unsupported_type() {
        let err = SaveError::UnsupportedType("tiff".to_string());
        assert_eq!(err.http_status_code(), 415);
        assert_eq!(err.error_code(), "UNSUPPORTED_TYPE");
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(err.client_message(), "Unsupported image type: tiff");
    }

    #[test]
    fn test_processing_failed_keeps_cause() {
        let err = SaveError::processing_failed(SaveError::InvalidImage(
            "truncated PNG body".to_string(),
        ));
        assert_eq!(err.kind(), ErrorKind::ProcessingFailed);
        assert_eq!(err.cause_kind(), Some(ErrorKind::InvalidImage));
        assert!(err.to_string().starts_with("Image processing failed"));
        assert!(err.detailed_message().contains("Caused by: Invalid image data"));
    }

    #[test]
    fn test_processing_failed_with_foreign_cause() {
        let err = SaveError::processing_failed(anyhow::anyhow!("encoder exploded"));
        assert_eq!(err.cause_kind(), None);
        assert_eq!(err.error_code(), "PROCESSING_FAILED");
        assert!(err.client_message().contains("encoder exploded"));
    }

    #[test]
    fn test_cause_kind_only_for_processing_failed() {
        let err = SaveError::StorageWriteError("disk full".to_string());
        assert_eq!(err.cause_kind(), None);
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}

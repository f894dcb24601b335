//! Filename resolution
//!
//! Picks the name an image is stored under. Caller-supplied names are used as
//! given (with the detected extension forced on them); otherwise a random name is
//! generated and checked against the target disk until a free one is found.
//!
//! No lock is held between the existence check and the eventual write, so two
//! concurrent saves can still race for the same generated name.

use imgstash_core::SaveError;
use imgstash_storage::{object_path, Storage};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Width of the `_<unix timestamp>` suffix budgeted for by the fallback name
const TIMESTAMP_SUFFIX_LEN: usize = 10;

/// Generated-name settings
#[derive(Debug, Clone, Copy)]
pub struct NamingPolicy {
    pub length: usize,
    pub max_attempts: usize,
}

/// Random alphanumeric string of `length` characters
pub fn random_name(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Base name of a caller-supplied filename: directories and everything from the
/// last `.` are dropped (`dir/photo.jpeg` -> `photo`).
///
/// Trailing separators are ignored, so `dir/` names `dir`. A leading dot starts
/// the extension, so `.hidden` leaves nothing. `None` when nothing usable is
/// left, in which case a name is generated.
pub fn requested_stem(requested: &str) -> Option<String> {
    let trimmed = requested.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let stem = match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    };
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Resolve the final filename for an image with the given extension.
pub async fn resolve_filename(
    storage: &dyn Storage,
    location: &str,
    requested: Option<&str>,
    extension: &str,
    policy: NamingPolicy,
) -> Result<String, SaveError> {
    if let Some(stem) = requested.and_then(requested_stem) {
        return Ok(format!("{}.{}", stem, extension));
    }

    for attempt in 1..=policy.max_attempts {
        let candidate = format!("{}.{}", random_name(policy.length), extension);
        let path = object_path(location, &candidate);

        let taken = storage
            .exists(&path)
            .await
            .map_err(SaveError::processing_failed)?;

        if !taken {
            return Ok(candidate);
        }

        tracing::debug!(path = %path, attempt = attempt, "Generated filename already taken");
    }

    let fallback = format!(
        "{}_{}.{}",
        random_name(policy.length.saturating_sub(TIMESTAMP_SUFFIX_LEN)),
        chrono::Utc::now().timestamp(),
        extension
    );

    tracing::warn!(
        location = %location,
        attempts = policy.max_attempts,
        filename = %fallback,
        "Could not find a free filename, using timestamp fallback"
    );

    Ok(fallback)
}

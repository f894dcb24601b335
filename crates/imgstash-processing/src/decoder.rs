//! Base64 payload decoding
//!
//! Turns the caller's string into raw bytes: strips an optional
//! `data:image/<subtype>;base64,` prefix, decodes, and enforces the size ceiling.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use imgstash_core::SaveError;
use regex::Regex;
use std::sync::LazyLock;

static DATA_URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/[^;]+;base64,").expect("data URL prefix pattern is valid")
});

/// Standard alphabet, padding optional
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Remove a leading data URL prefix, if any.
pub fn strip_data_url(input: &str) -> &str {
    match DATA_URL_PREFIX.find(input) {
        Some(m) => &input[m.end()..],
        None => input,
    }
}

/// Decode a base64 payload into raw bytes.
///
/// Fails with `InvalidInput` for an empty payload, `DecodeError` for malformed
/// base64 and `PayloadTooLarge` when the decoded length exceeds `max_bytes`.
/// Payloads whose encoded length already rules them out are rejected before
/// any decoding, so an oversized body is never materialized.
pub fn decode(raw_input: &str, max_bytes: usize) -> Result<Vec<u8>, SaveError> {
    let body = strip_data_url(raw_input.trim());
    if body.is_empty() {
        return Err(SaveError::InvalidInput(
            "Base64 image data is required".to_string(),
        ));
    }

    // Line-wrapped payloads (MIME style) are common
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let min_decoded = min_decoded_len(compact.len());
    if min_decoded > max_bytes {
        return Err(SaveError::PayloadTooLarge {
            size: min_decoded,
            max: max_bytes,
        });
    }

    let bytes = PAYLOAD_ENGINE
        .decode(compact.as_bytes())
        .map_err(|e| SaveError::DecodeError(e.to_string()))?;

    if bytes.len() > max_bytes {
        return Err(SaveError::PayloadTooLarge {
            size: bytes.len(),
            max: max_bytes,
        });
    }

    tracing::debug!(size_bytes = bytes.len(), "Decoded base64 payload");

    Ok(bytes)
}

/// Fewest bytes `encoded_len` base64 characters can decode to (at most two
/// padding characters in the final quad).
fn min_decoded_len(encoded_len: usize) -> usize {
    (encoded_len / 4 * 3).saturating_sub(2)
}

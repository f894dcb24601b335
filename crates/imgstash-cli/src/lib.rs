use anyhow::Context;
use imgstash_core::{ErrorMetadata, SaveError};
use std::io::Read;
use std::path::Path;

/// Read a base64 payload from `input`, or from stdin when it is `None` or `-`.
pub fn read_payload(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload from {}", path.display())),
        _ => {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .context("Failed to read payload from stdin")?;
            Ok(payload)
        }
    }
}

/// JSON body printed when a save fails
pub fn error_report(err: &SaveError) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "error_code": err.error_code(),
        "message": err.client_message(),
        "details": err.detailed_message(),
    })
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays JSON.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("imgstash=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

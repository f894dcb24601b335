//! imgstash: save base64 images to configured disks, or delete them.
//!
//! Configuration is read from the environment (and `.env`), see `ImageConfig::from_env`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use imgstash_cli::{error_report, init_tracing, read_payload};
use imgstash_core::{ImageConfig, SaveRequest};
use imgstash_processing::ImageManager;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "imgstash", about = "Store base64-encoded images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode, validate and store a base64 image; prints the result as JSON
    Save {
        /// File holding the payload ("-" or omitted for stdin)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Target disk (defaults to BASE64_IMAGE_DISK)
        #[arg(long)]
        disk: Option<String>,
        /// Directory within the disk
        #[arg(long)]
        location: Option<String>,
        /// Base name to store under; the extension is replaced by the detected one
        #[arg(long)]
        filename: Option<String>,
        /// Encoding quality, 1-100
        #[arg(long)]
        quality: Option<u8>,
        /// Target width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Target height in pixels
        #[arg(long)]
        height: Option<u32>,
        /// Resize to exactly width x height instead of keeping the aspect ratio
        #[arg(long)]
        exact: bool,
    },
    /// Delete a stored image; prints true if something was removed
    Delete {
        /// Path within the disk, e.g. uploads/abc.png
        path: String,
        /// Disk to delete from (defaults to BASE64_IMAGE_DISK)
        #[arg(long)]
        disk: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    let config = ImageConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(settings = ?config.summary(), "Configuration loaded");

    let manager = ImageManager::from_config(config)
        .await
        .context("Failed to initialize disks")?;

    match cli.command {
        Commands::Save {
            input,
            disk,
            location,
            filename,
            quality,
            width,
            height,
            exact,
        } => {
            let payload = read_payload(input.as_deref())?;

            let request = SaveRequest {
                disk,
                location,
                filename,
                quality,
                width,
                height,
                maintain_aspect_ratio: !exact,
                ..SaveRequest::new(payload)
            };

            match manager.save(request).await {
                Ok(saved) => {
                    println!("{}", serde_json::to_string_pretty(&saved)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&error_report(&e))?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Delete { path, disk } => {
            let removed = manager.delete(&path, disk.as_deref()).await;
            println!("{}", removed);
            Ok(ExitCode::SUCCESS)
        }
    }
}

//! Background upload command.

use std::path::Path;

use draftbuddy_core::imaging::{self, Cropper};

use crate::cli::UploadArgs;
use crate::error::CliError;
use crate::output::get_formatter;
use crate::session;

/// Run the upload command
pub async fn run_upload(
    args: UploadArgs,
    device: Option<String>,
    timeout: u64,
    json: bool,
) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    if !(0.0..=1.0).contains(&args.zoom) {
        return Err(CliError::InvalidArgument(format!(
            "zoom must be between 0.0 and 1.0, got {}",
            args.zoom
        )));
    }

    if !Path::new(&args.image).exists() {
        return Err(CliError::InvalidArgument(format!(
            "Image file not found: {}",
            args.image
        )));
    }

    let data = tokio::fs::read(&args.image).await?;
    let source = image::load_from_memory(&data)
        .map_err(|e| CliError::InvalidArgument(format!("Could not decode {}: {}", args.image, e)))?
        .to_rgba8();

    let canvas = imaging::prepare_canvas(&source);

    let mut cropper = Cropper::new(canvas, imaging::OUTPUT_SIZE, imaging::OUTPUT_SIZE);
    if args.zoom > 0.0 {
        cropper.set_zoom_fraction(args.zoom);
    }
    if args.pan_x != 0.0 || args.pan_y != 0.0 {
        cropper.pan(args.pan_x, args.pan_y);
    }

    let jpeg = imaging::encode_jpeg(&cropper.crop())?;

    let manager = session::establish(device, timeout).await?;

    if !json {
        if let Some(addr) = manager.base_address().await {
            println!("Uploading {} bytes to {}...", jpeg.len(), addr);
        }
    }

    manager.upload_background(jpeg).await?;
    manager.shutdown().await;

    println!(
        "{}",
        formatter.format_message(&format!("Uploaded {} as the new background", args.image))
    );

    Ok(())
}

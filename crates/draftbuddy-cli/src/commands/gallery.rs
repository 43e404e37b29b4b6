//! Gallery management commands.

use std::path::{Path, PathBuf};

use draftbuddy_core::api::BACKGROUND_SIZE;
use draftbuddy_core::error::CoreError;
use draftbuddy_core::imaging::rgb565;

use crate::cli::{GalleryArgs, GalleryCommands, GalleryFetchArgs};
use crate::error::CliError;
use crate::output::get_formatter;
use crate::session;

/// Run the gallery command
pub async fn run_gallery(
    args: GalleryArgs,
    device: Option<String>,
    timeout: u64,
    json: bool,
) -> Result<(), CliError> {
    match args.command {
        GalleryCommands::List => run_list(device, timeout, json).await,
        GalleryCommands::Fetch(fetch) => run_fetch(fetch, device, timeout, json).await,
        GalleryCommands::Set(set) => run_action(&set.name, Action::Set, device, timeout, json).await,
        GalleryCommands::Delete(del) => {
            run_action(&del.name, Action::Delete, device, timeout, json).await
        }
    }
}

enum Action {
    Set,
    Delete,
}

async fn run_list(device: Option<String>, timeout: u64, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let manager = session::establish(device, timeout).await?;
    let images = manager.gallery().await?;
    manager.shutdown().await;

    println!("{}", formatter.format_gallery(&images));

    Ok(())
}

async fn run_fetch(
    args: GalleryFetchArgs,
    device: Option<String>,
    timeout: u64,
    json: bool,
) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let manager = session::establish(device, timeout).await?;

    let image = if args.full {
        let data = manager.background_raw(&args.name).await?;
        rgb565::decode(&data, BACKGROUND_SIZE, BACKGROUND_SIZE)
    } else {
        manager.load_thumbnail(&args.name).await
    };

    manager.shutdown().await;

    let image = image.ok_or_else(|| {
        CliError::Other(format!("Could not decode image data for {}", args.name))
    })?;

    let out = match args.out {
        Some(path) => PathBuf::from(path),
        None => default_output_name(&args.name),
    };

    image.save(&out).map_err(CoreError::from)?;

    println!(
        "{}",
        formatter.format_message(&format!(
            "Saved {} ({}x{})",
            out.display(),
            image.width(),
            image.height()
        ))
    );

    Ok(())
}

async fn run_action(
    name: &str,
    action: Action,
    device: Option<String>,
    timeout: u64,
    json: bool,
) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let manager = session::establish(device, timeout).await?;

    let message = match action {
        Action::Set => {
            manager.set_background(name).await?;
            format!("Background set: {}", name)
        }
        Action::Delete => {
            manager.delete_background(name).await?;
            format!("Deleted: {}", name)
        }
    };

    manager.shutdown().await;

    println!("{}", formatter.format_message(&message));

    Ok(())
}

fn default_output_name(name: &str) -> PathBuf {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    PathBuf::from(format!("{}.png", stem))
}

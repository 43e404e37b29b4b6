//! Discover command implementation.

use draftbuddy_core::connection::{ConnectionManager, ManagerConfig};
use draftbuddy_core::types::{DeviceRecord, OperatingMode};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{DiscoverArgs, ModeFilter};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the discover command
pub async fn run_discover(args: DiscoverArgs, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let mut config = ManagerConfig::default();
    config.scan.concurrency = args.concurrency.max(1);

    let total = config.scan.candidates().len();
    let manager = ConnectionManager::new(config)?;

    let devices = if json {
        manager.scan_for_devices(|_, _, _| {}).await
    } else if args.watch_progress {
        println!("Scanning {} addresses...", total);

        let mut last_percent = None;
        manager
            .scan_for_devices(move |percent, scanned, total| {
                if last_percent != Some(percent) {
                    last_percent = Some(percent);
                    println!("Scanned {}/{} ({}%)", scanned, total, percent);
                }
            })
            .await
    } else {
        println!("Scanning {} addresses...", total);

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
                )
                .unwrap()
                .progress_chars("#>-"),
        );

        let tick = bar.clone();
        let devices = manager
            .scan_for_devices(move |_, scanned, _| tick.set_position(scanned as u64))
            .await;
        bar.finish_and_clear();
        devices
    };

    let devices = filter_devices(devices, args.mode);

    println!("{}", formatter.format_devices(&devices));

    if devices.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}

fn filter_devices(devices: Vec<DeviceRecord>, filter: Option<ModeFilter>) -> Vec<DeviceRecord> {
    match filter {
        Some(filter) => {
            let mode = match filter {
                ModeFilter::Service => OperatingMode::Service,
                ModeFilter::Slave => OperatingMode::Slave,
                ModeFilter::Unknown => OperatingMode::Unknown,
            };
            devices.into_iter().filter(|d| d.mode == mode).collect()
        }
        None => devices,
    }
}

//! Status command implementation.

use crate::error::CliError;
use crate::output::get_formatter;
use crate::session;

/// Run the status command
pub async fn run_status(device: Option<String>, timeout: u64, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    if device.is_none() && !json {
        println!("Scanning for DraftBuddy devices...");
    }

    let manager = session::establish(device, timeout).await?;

    let connected = manager.is_connected().await;
    let record = manager
        .current_device()
        .await
        .ok_or_else(|| CliError::Other("No device record available".to_string()))?;

    manager.shutdown().await;

    println!("{}", formatter.format_device_status(&record, connected));

    Ok(())
}

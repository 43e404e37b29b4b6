//! Shared connection setup for CLI commands.

use std::time::Duration;

use draftbuddy_core::connection::{ConnectionManager, ManagerConfig};

use crate::error::{CliError, Result};

/// Build a manager config from the global CLI flags.
pub fn manager_config(timeout_secs: u64) -> ManagerConfig {
    ManagerConfig {
        request_timeout: Duration::from_secs(timeout_secs),
        ..Default::default()
    }
}

/// Connect to a frame and return the manager holding the connection.
///
/// When `device` is given the address is adopted directly and only the
/// health check has to pass. Otherwise the full discovery sweep runs and
/// the manager picks a device on its own.
pub async fn establish(device: Option<String>, timeout_secs: u64) -> Result<ConnectionManager> {
    let manager = ConnectionManager::new(manager_config(timeout_secs))?;
    connect(&manager, device).await?;
    Ok(manager)
}

async fn connect(manager: &ConnectionManager, device: Option<String>) -> Result<()> {
    match device {
        Some(addr) => {
            manager.set_address(&addr).await;
            if !manager.check_connection().await {
                return Err(CliError::ConnectionFailed(format!(
                    "{} did not answer the health check",
                    addr
                )));
            }
        }
        None => {
            if !manager.auto_connect().await {
                if manager.discovered_devices().await.is_empty() {
                    return Err(CliError::NoDevicesFound);
                }
                return Err(CliError::ConnectionFailed(
                    "discovered device failed the health check".to_string(),
                ));
            }
        }
    }

    Ok(())
}

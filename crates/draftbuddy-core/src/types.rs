//! Type definitions for the DraftBuddy client.
//!
//! `StatusPayload` mirrors the JSON body the appliance serves at `/status`;
//! every field is optional on the wire and substituted with an explicit
//! default when absent. `DeviceRecord` is the client-side identity built
//! from one successful probe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product token looked for in the declared device name.
pub const PRODUCT_TOKEN: &str = "DraftBuddy";

/// Service identifier some firmware revisions declare instead of a name.
pub const SERVICE_ID: &str = "draftbuddy";

/// Display name used when the status body declares none.
pub const DEFAULT_DEVICE_NAME: &str = "DraftBuddy Device";

/// Represents a discovered DraftBuddy device.
///
/// Immutable once constructed; rediscovery replaces the record wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Device address (primary identifier for runtime)
    pub addr: String,
    /// Display name
    pub name: String,
    /// Operating mode
    pub mode: OperatingMode,
    /// Uptime in seconds
    pub uptime: u64,
    /// Wi-Fi network the device is joined to
    pub wifi_ssid: String,
    /// Number of follower panels paired to this device
    pub peer_count: u32,
    /// Free heap in bytes
    pub free_heap: u64,
    /// When this record was built from a probe response
    pub found_at: DateTime<Utc>,
}

impl DeviceRecord {
    /// Build a record from a status response, substituting defaults for
    /// any field the body omitted.
    pub fn from_status(addr: &str, status: &StatusPayload) -> Self {
        Self {
            addr: addr.to_string(),
            name: status
                .device
                .clone()
                .unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string()),
            mode: OperatingMode::from_str(status.mode.as_deref().unwrap_or("unknown")),
            uptime: status.uptime.unwrap_or(0),
            wifi_ssid: status
                .wifi_ssid
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            peer_count: status.slave_count.unwrap_or(0),
            free_heap: status.free_heap.unwrap_or(0),
            found_at: Utc::now(),
        }
    }
}

/// Device operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    /// Fully provisioned master serving the gallery API (preferred)
    Service,
    /// Follower panel mirroring a master
    Slave,
    /// Unknown/undeclared mode
    Unknown,
}

impl OperatingMode {
    /// Parse a mode string from a status body
    pub fn from_str(s: &str) -> Self {
        match s {
            "service" => OperatingMode::Service,
            "slave" => OperatingMode::Slave,
            _ => OperatingMode::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Service => "service",
            OperatingMode::Slave => "slave",
            OperatingMode::Unknown => "unknown",
        }
    }
}

/// Wire shape of `GET /status`.
///
/// Field names match the firmware's JSON; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    /// Declared device name
    pub device: Option<String>,
    /// Declared service identifier
    pub service: Option<String>,
    /// Operating mode string
    pub mode: Option<String>,
    /// Uptime in seconds
    pub uptime: Option<u64>,
    /// Joined Wi-Fi SSID
    pub wifi_ssid: Option<String>,
    /// Paired follower count
    pub slave_count: Option<u32>,
    /// Free heap in bytes
    pub free_heap: Option<u64>,
}

impl StatusPayload {
    /// Device-identity predicate: the declared name contains the product
    /// token, or the declared service identifier matches.
    pub fn is_draftbuddy(&self) -> bool {
        self.device
            .as_deref()
            .map(|d| d.contains(PRODUCT_TOKEN))
            .unwrap_or(false)
            || self.service.as_deref() == Some(SERVICE_ID)
    }
}

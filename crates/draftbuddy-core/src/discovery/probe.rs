//! Single-address status probe.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::types::{DeviceRecord, StatusPayload};

/// Well-known status path every DraftBuddy serves.
pub const STATUS_PATH: &str = "/status";

/// Per-address probe timeout. Almost every candidate is a dead address,
/// so this bounds the worst-case duration of a full scan pass.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(800);

/// Probe one candidate address for a DraftBuddy.
///
/// Issues `GET http://{addr}/status` with the given timeout and checks the
/// decoded body against the identity predicate. Timeout, refused
/// connection, non-2xx status, undecodable body, and wrong-device responses
/// are all expected misses and yield `None` — a probe never errors.
pub async fn probe_address(
    client: &Client,
    addr: &str,
    timeout: Duration,
) -> Option<DeviceRecord> {
    let url = format!("http://{}{}", addr, STATUS_PATH);

    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json")
        .timeout(timeout)
        .send()
        .await
        .ok()?;

    if !response.status().is_success() {
        return None;
    }

    let status: StatusPayload = response.json().await.ok()?;
    if !status.is_draftbuddy() {
        return None;
    }

    let record = DeviceRecord::from_status(addr, &status);
    debug!(addr, name = %record.name, mode = record.mode.as_str(), "probe hit");
    Some(record)
}

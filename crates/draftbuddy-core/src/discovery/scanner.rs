//! Parallel subnet sweep for DraftBuddy devices.

use std::ops::Range;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::info;

use crate::discovery::probe::{probe_address, PROBE_TIMEOUT};
use crate::types::DeviceRecord;

/// Network-range prefixes covering the common private subnets.
pub const SCAN_RANGES: [&str; 6] = [
    "192.168.1.",
    "192.168.0.",
    "192.168.2.",
    "10.0.0.",
    "10.0.1.",
    "172.16.0.",
];

/// Host-suffix band most consumer DHCP pools hand out.
pub const HOST_SUFFIXES: Range<u8> = 100..200;

/// Default cap on in-flight probes.
pub const DEFAULT_CONCURRENCY: usize = 64;

/// Scan parameters.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Network-range prefixes to sweep
    pub ranges: Vec<String>,
    /// Host suffixes appended to each prefix
    pub hosts: Range<u8>,
    /// Explicit addresses probed instead of the range sweep when set
    pub addresses: Option<Vec<String>>,
    /// Cap on concurrent in-flight probes
    pub concurrency: usize,
    /// Per-address probe timeout
    pub probe_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ranges: SCAN_RANGES.iter().map(|r| r.to_string()).collect(),
            hosts: HOST_SUFFIXES,
            addresses: None,
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: PROBE_TIMEOUT,
        }
    }
}

impl ScanConfig {
    /// Enumerate every candidate address this config covers, range-major.
    /// An explicit address list takes precedence over the range sweep.
    pub fn candidates(&self) -> Vec<String> {
        if let Some(addresses) = &self.addresses {
            return addresses.clone();
        }

        self.ranges
            .iter()
            .flat_map(|prefix| {
                self.hosts
                    .clone()
                    .map(move |host| format!("{}{}", prefix, host))
            })
            .collect()
    }
}

/// Sweep every candidate address in `config`.
///
/// Probes run concurrently up to the configured cap. After each probe
/// settles, `progress` receives `(percent, scanned, total)` with percent
/// rounded to an integer. Returns matched records in completion order —
/// network timing, not address order — and resolves only once every probe
/// has settled.
pub async fn scan<F>(client: &Client, config: &ScanConfig, progress: F) -> Vec<DeviceRecord>
where
    F: FnMut(u8, usize, usize),
{
    let candidates = config.candidates();
    scan_addresses(client, &candidates, config, progress).await
}

/// Sweep an explicit candidate list with the timeout and cap from `config`.
pub async fn scan_addresses<F>(
    client: &Client,
    candidates: &[String],
    config: &ScanConfig,
    mut progress: F,
) -> Vec<DeviceRecord>
where
    F: FnMut(u8, usize, usize),
{
    let total = candidates.len();
    if total == 0 {
        return Vec::new();
    }

    let concurrency = config.concurrency.max(1);
    let timeout = config.probe_timeout;

    let mut probes = stream::iter(candidates.iter().cloned())
        .map(|addr| {
            let client = client.clone();
            async move { probe_address(&client, &addr, timeout).await }
        })
        .buffer_unordered(concurrency);

    let mut found = Vec::new();
    let mut scanned = 0usize;

    while let Some(outcome) = probes.next().await {
        scanned += 1;
        progress(percent_complete(scanned, total), scanned, total);
        if let Some(record) = outcome {
            found.push(record);
        }
    }

    info!(found = found.len(), scanned, "scan complete");
    found
}

/// Integer percent, rounded half away from zero.
fn percent_complete(scanned: usize, total: usize) -> u8 {
    ((scanned * 100) as f64 / total as f64).round() as u8
}

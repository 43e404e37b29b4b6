//! HTTP subnet discovery module.
//!
//! Provides the single-address status probe and the parallel scanner that
//! sweeps the candidate ranges with a bounded concurrency cap.

pub mod probe;
pub mod scanner;

pub use probe::{probe_address, PROBE_TIMEOUT, STATUS_PATH};
pub use scanner::{scan, scan_addresses, ScanConfig, DEFAULT_CONCURRENCY, SCAN_RANGES};

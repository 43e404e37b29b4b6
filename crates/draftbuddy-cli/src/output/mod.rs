//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use draftbuddy_core::types::DeviceRecord;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format device list
    fn format_devices(&self, devices: &[DeviceRecord]) -> String;

    /// Format one device together with its connection state
    fn format_device_status(&self, device: &DeviceRecord, connected: bool) -> String;

    /// Format the gallery image list
    fn format_gallery(&self, images: &[String]) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}

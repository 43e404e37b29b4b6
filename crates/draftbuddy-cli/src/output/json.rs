//! JSON-formatted output for CLI.

use draftbuddy_core::types::DeviceRecord;
use serde::Serialize;
use serde_json::{json, Value};

use super::OutputFormatter;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &[DeviceRecord]) -> String {
        let output = json!({
            "devices": devices,
            "count": devices.len()
        });
        Self::to_json(&output)
    }

    fn format_device_status(&self, device: &DeviceRecord, connected: bool) -> String {
        let mut output = serde_json::to_value(device).unwrap_or(json!({}));

        if let Value::Object(ref mut map) = output {
            map.insert("connected".to_string(), json!(connected));
        }

        Self::to_json(&output)
    }

    fn format_gallery(&self, images: &[String]) -> String {
        let output = json!({
            "images": images,
            "count": images.len()
        });
        Self::to_json(&output)
    }

    fn format_message(&self, message: &str) -> String {
        Self::to_json(&json!({ "message": message }))
    }
}

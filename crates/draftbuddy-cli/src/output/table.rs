//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};
use draftbuddy_core::types::DeviceRecord;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_uptime(secs: u64) -> String {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, secs % 60)
        } else {
            format!("{}s", secs)
        }
    }

    fn format_heap(bytes: u64) -> String {
        format!("{} KB", bytes / 1024)
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[DeviceRecord]) -> String {
        if devices.is_empty() {
            return "No devices found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            "Address", "Name", "Mode", "Uptime", "SSID", "Peers", "Free Heap", "Found",
        ]);

        for device in devices {
            table.add_row(vec![
                Cell::new(&device.addr),
                Cell::new(&device.name),
                Cell::new(device.mode.as_str()),
                Cell::new(Self::format_uptime(device.uptime)),
                Cell::new(&device.wifi_ssid),
                Cell::new(device.peer_count.to_string()),
                Cell::new(Self::format_heap(device.free_heap)),
                Cell::new(device.found_at.format("%H:%M:%S").to_string()),
            ]);
        }

        format!("{}\n\nFound {} device(s)", table, devices.len())
    }

    fn format_device_status(&self, device: &DeviceRecord, connected: bool) -> String {
        let connection = if connected {
            format!("{} connected", "[OK]".green())
        } else {
            format!("{} offline", "[X]".red())
        };

        let lines = vec![
            format!("Device: {} ({})", device.name, device.addr),
            format!("  Mode:       {}", device.mode.as_str()),
            format!("  Uptime:     {}", Self::format_uptime(device.uptime)),
            format!("  Wi-Fi:      {}", device.wifi_ssid),
            format!("  Peers:      {}", device.peer_count),
            format!("  Free Heap:  {}", Self::format_heap(device.free_heap)),
            format!("  Connection: {}", connection),
        ];

        lines.join("\n")
    }

    fn format_gallery(&self, images: &[String]) -> String {
        if images.is_empty() {
            return "No images on device.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Image"]);

        for (index, name) in images.iter().enumerate() {
            table.add_row(vec![Cell::new((index + 1).to_string()), Cell::new(name)]);
        }

        format!("{}\n\n{} image(s)", table, images.len())
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

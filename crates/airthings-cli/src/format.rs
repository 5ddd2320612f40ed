//! Output formatting for text and JSON output.

use serde::Serialize;

use airthings_core::DiscoveredDevice;
use airthings_types::{DeviceReading, Sensors};

const UNKNOWN: &str = "Unknown";

/// JSON view of a reading with the model rendered as its product name.
#[derive(Debug, Serialize)]
struct JsonReading<'a> {
    name: Option<&'a str>,
    model: Option<&'static str>,
    manufacturer: Option<&'a str>,
    serial: Option<&'a str>,
    firmware: Option<&'a str>,
    address: &'a str,
    sensors: &'a Sensors,
}

impl<'a> From<&'a DeviceReading> for JsonReading<'a> {
    fn from(reading: &'a DeviceReading) -> Self {
        Self {
            name: reading.name.as_deref(),
            model: reading.product_name(),
            manufacturer: reading.manufacturer.as_deref(),
            serial: reading.serial.as_deref(),
            firmware: reading.firmware.as_deref(),
            address: &reading.address,
            sensors: &reading.sensors,
        }
    }
}

/// Format a reading as a text block terminated by a blank line.
///
/// Sensors are listed in name order.
#[must_use]
pub fn format_reading_text(reading: &DeviceReading) -> String {
    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());

    let mut output = String::new();
    output.push_str("Device info:\n");
    output.push_str(&format!("  Name: {}\n", or_unknown(&reading.name)));
    output.push_str(&format!("  Model: {}\n", reading.product_name().unwrap_or(UNKNOWN)));
    output.push_str(&format!("  Manufacturer: {}\n", or_unknown(&reading.manufacturer)));
    output.push_str(&format!("  Serial: {}\n", or_unknown(&reading.serial)));
    output.push_str(&format!("  Firmware: {}\n", or_unknown(&reading.firmware)));
    output.push_str(&format!("  Address: {}\n", reading.address));
    output.push_str("Sensors:\n");
    for (name, value) in &reading.sensors {
        output.push_str(&format!("  {}: {}\n", name, value));
    }
    output.push('\n');
    output
}

/// Format a reading as a single-line JSON object (no trailing newline).
pub fn format_reading_json(reading: &DeviceReading) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReading::from(reading))
}

/// One line of the discovered-device list.
#[must_use]
pub fn format_device_line(device: &DiscoveredDevice) -> String {
    match device.rssi {
        Some(rssi) => format!("  {} ({}) {} dBm", device.address, device.display_name(), rssi),
        None => format!("  {} ({})", device.address, device.display_name()),
    }
}

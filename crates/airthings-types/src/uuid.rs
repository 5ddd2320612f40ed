//! Bluetooth identifiers for Airthings devices.
//!
//! This module contains the company id and UUIDs needed to identify and
//! read Airthings monitors over Bluetooth Low Energy.

use uuid::{Uuid, uuid};

// --- Advertisement ---

/// Airthings AS company identifier in manufacturer-specific advertisement data.
pub const MANUFACTURER_ID: u16 = 0x0334;

// --- Current values characteristics ---

/// Current values characteristic of the Wave Plus.
pub const WAVE_PLUS_CURRENT_VALUES: Uuid = uuid!("b42e2a68-ade7-11e4-89d3-123b93f75cba");

/// Current values characteristic of the Wave Radon (2nd generation Wave).
pub const WAVE_RADON_CURRENT_VALUES: Uuid = uuid!("b42e4dcc-ade7-11e4-89d3-123b93f75cba");

/// Current values characteristic of the Wave Mini.
pub const WAVE_MINI_CURRENT_VALUES: Uuid = uuid!("b42e3b98-ade7-11e4-89d3-123b93f75cba");

// --- Device Information Characteristic UUIDs ---

/// Device name characteristic.
pub const DEVICE_NAME: Uuid = uuid!("00002a00-0000-1000-8000-00805f9b34fb");

/// Firmware revision string characteristic.
pub const FIRMWARE_REVISION: Uuid = uuid!("00002a26-0000-1000-8000-00805f9b34fb");

/// Manufacturer name string characteristic.
pub const MANUFACTURER_NAME: Uuid = uuid!("00002a29-0000-1000-8000-00805f9b34fb");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_values_uuids_are_distinct() {
        assert_ne!(WAVE_PLUS_CURRENT_VALUES, WAVE_RADON_CURRENT_VALUES);
        assert_ne!(WAVE_PLUS_CURRENT_VALUES, WAVE_MINI_CURRENT_VALUES);
        assert_ne!(WAVE_RADON_CURRENT_VALUES, WAVE_MINI_CURRENT_VALUES);
    }

    #[test]
    fn test_standard_uuids_use_bluetooth_base() {
        for id in [DEVICE_NAME, FIRMWARE_REVISION, MANUFACTURER_NAME] {
            assert!(id.to_string().ends_with("-0000-1000-8000-00805f9b34fb"));
        }
    }
}

//! Device discovery and scanning.
//!
//! This module runs timed BLE discovery passes and turns the peripherals an
//! adapter has seen into [`DiscoveredDevice`] records.

use std::collections::HashMap;
use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::util::{addresses_match, create_identifier};
use airthings_types::uuid::MANUFACTURER_ID;

/// Default discovery window in seconds.
pub const DEFAULT_SCAN_SECS: f64 = 8.0;

/// A BLE advertisement record observed during one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Connection identifier (MAC address, or peripheral ID on macOS).
    pub address: String,
    /// Advertised local name.
    pub name: Option<String>,
    /// RSSI signal strength.
    pub rssi: Option<i16>,
    /// Manufacturer-specific advertisement payloads keyed by company id.
    pub manufacturer_data: HashMap<u16, Vec<u8>>,
}

impl DiscoveredDevice {
    /// Create a record with only an address and optional name.
    pub fn new(address: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            address: address.into(),
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    /// Attach a manufacturer-specific payload.
    #[must_use]
    pub fn with_manufacturer_data(mut self, company_id: u16, data: Vec<u8>) -> Self {
        self.manufacturer_data.insert(company_id, data);
        self
    }

    /// Airthings manufacturer payload, if advertised.
    pub fn airthings_data(&self) -> Option<&[u8]> {
        self.manufacturer_data
            .get(&MANUFACTURER_ID)
            .map(Vec::as_slice)
    }

    /// Whether the advertisement carries the Airthings company id.
    pub fn is_airthings(&self) -> bool {
        self.airthings_data().is_some()
    }

    /// Case-insensitive address comparison.
    pub fn matches_address(&self, address: &str) -> bool {
        addresses_match(&self.address, address)
    }

    /// Name for display, or `"Unknown"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// Options for scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How long to scan for devices.
    pub duration: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs_f64(DEFAULT_SCAN_SECS),
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Validate a discovery window given in seconds.
///
/// Zero, negative, NaN and infinite values are configuration errors.
///
/// ```
/// use airthings_core::scan::scan_duration;
///
/// assert_eq!(scan_duration(2.5).unwrap().as_millis(), 2500);
/// assert!(scan_duration(0.0).is_err());
/// assert!(scan_duration(-1.0).is_err());
/// ```
pub fn scan_duration(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Error::invalid_config(format!(
            "scan timeout must be a positive number of seconds, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| Error::invalid_config(format!("scan timeout {} out of range: {}", secs, e)))
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    use crate::error::DeviceNotFoundReason;

    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Scan for BLE devices using a specific adapter.
///
/// Returns every peripheral that reported properties, sorted by address.
/// An empty list indicates no devices were found (not an error).
#[tracing::instrument(level = "debug", skip_all, fields(duration = ?options.duration))]
pub async fn scan_with_adapter(
    adapter: &Adapter,
    options: ScanOptions,
) -> Result<Vec<DiscoveredDevice>> {
    info!(
        "Starting BLE scan for {:.1} seconds...",
        options.duration.as_secs_f64()
    );

    adapter.start_scan(ScanFilter::default()).await?;
    sleep(options.duration).await;
    adapter.stop_scan().await?;

    let peripherals = adapter.peripherals().await?;
    let mut discovered = Vec::with_capacity(peripherals.len());

    for peripheral in peripherals {
        match process_peripheral(&peripheral).await {
            Ok(Some(device)) => {
                debug!(
                    address = %device.address,
                    name = ?device.name,
                    airthings = device.is_airthings(),
                    "Found device"
                );
                discovered.push(device);
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Error processing peripheral: {}", e);
            }
        }
    }

    discovered.sort_by(|a, b| a.address.cmp(&b.address));
    info!("Scan complete. Found {} device(s)", discovered.len());
    Ok(discovered)
}

async fn process_peripheral(peripheral: &Peripheral) -> Result<Option<DiscoveredDevice>> {
    let Some(properties) = peripheral.properties().await? else {
        return Ok(None);
    };

    let address = create_identifier(&properties.address.to_string(), &peripheral.id());

    Ok(Some(DiscoveredDevice {
        address,
        name: properties.local_name,
        rssi: properties.rssi,
        manufacturer_data: properties.manufacturer_data,
    }))
}

/// Search the adapter's known peripherals for one with the given identifier.
pub async fn find_peripheral(adapter: &Adapter, identifier: &str) -> Result<Option<Peripheral>> {
    for peripheral in adapter.peripherals().await? {
        if let Ok(Some(props)) = peripheral.properties().await {
            let candidate = create_identifier(&props.address.to_string(), &peripheral.id());
            if addresses_match(&candidate, identifier) {
                debug!("Matched peripheral {}", candidate);
                return Ok(Some(peripheral));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_duration_accepts_fractional_seconds() {
        assert_eq!(scan_duration(8.0).unwrap(), Duration::from_secs(8));
        assert_eq!(scan_duration(0.25).unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_scan_duration_rejects_non_positive() {
        for secs in [0.0, -0.0, -1.0, -8.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = scan_duration(secs).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{secs} accepted");
        }
    }

    #[test]
    fn test_scan_duration_rejects_overflow() {
        assert!(scan_duration(f64::MAX).is_err());
    }

    #[test]
    fn test_scan_options_default() {
        let options = ScanOptions::default();
        assert_eq!(options.duration, Duration::from_secs(8));

        let options = ScanOptions::new().duration(scan_duration(3.5).unwrap());
        assert_eq!(options.duration, Duration::from_millis(3500));
    }

    #[test]
    fn test_discovered_device_airthings_detection() {
        let plain = DiscoveredDevice::new("11:22:33:44:55:66", Some("Phone"));
        assert!(!plain.is_airthings());
        assert_eq!(plain.airthings_data(), None);

        let wave = DiscoveredDevice::new("AA:BB:CC:DD:EE:FF", None)
            .with_manufacturer_data(MANUFACTURER_ID, vec![1, 2, 3, 4]);
        assert!(wave.is_airthings());
        assert_eq!(wave.airthings_data(), Some(&[1u8, 2, 3, 4][..]));
        assert_eq!(wave.display_name(), "Unknown");
    }

    #[test]
    fn test_discovered_device_matches_address_case_insensitively() {
        let device = DiscoveredDevice::new("AA:BB:CC:DD:EE:FF", Some("Wave Plus"));
        assert!(device.matches_address("aa:bb:cc:dd:ee:ff"));
        assert!(!device.matches_address("aa:bb:cc:dd:ee:00"));
    }
}

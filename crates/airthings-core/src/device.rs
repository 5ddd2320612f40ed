//! Connected Airthings device.
//!
//! A [`Device`] wraps a connected BLE peripheral whose services have been
//! discovered, and exposes the characteristic reads needed to build a
//! [`DeviceReading`](airthings_types::DeviceReading).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use btleplug::api::{Characteristic, Peripheral as _};
use btleplug::platform::Peripheral;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::util::{create_identifier, format_peripheral_id, read_string};
use airthings_types::DeviceInfo;
use airthings_types::uuid::{DEVICE_NAME, FIRMWARE_REVISION, MANUFACTURER_NAME};

/// Default timeout for BLE characteristic read operations.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for BLE connection operations.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for service discovery.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for BLE connection timeouts.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use airthings_core::device::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .connection_timeout(Duration::from_secs(20))
///     .read_timeout(Duration::from_secs(15));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Timeout for establishing a BLE connection.
    pub connection_timeout: Duration,
    /// Timeout for BLE read operations.
    pub read_timeout: Duration,
    /// Timeout for service discovery after connection.
    pub discovery_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }
}

impl ConnectionConfig {
    /// Create a new connection config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the service discovery timeout.
    #[must_use]
    pub fn discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }
}

/// A connected Airthings peripheral.
///
/// # Cleanup
///
/// Call [`Device::disconnect`] when done. If a `Device` is dropped while
/// still connected, a best-effort disconnect is spawned and a warning logged.
pub struct Device {
    peripheral: Peripheral,
    name: Option<String>,
    address: String,
    /// Characteristics by UUID, built once after service discovery.
    characteristics: HashMap<Uuid, Characteristic>,
    disconnected: AtomicBool,
    config: ConnectionConfig,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("characteristics", &self.characteristics.len())
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Connect to a discovered peripheral and discover its services.
    #[tracing::instrument(level = "info", skip_all, fields(connect_timeout = ?config.connection_timeout))]
    pub async fn from_peripheral_with_config(
        peripheral: Peripheral,
        config: ConnectionConfig,
    ) -> Result<Self> {
        let properties = peripheral.properties().await?;
        let name = properties.as_ref().and_then(|p| p.local_name.clone());
        let address = properties
            .as_ref()
            .map(|p| create_identifier(&p.address.to_string(), &peripheral.id()))
            .unwrap_or_else(|| format_peripheral_id(&peripheral.id()));

        info!("Connecting to {}...", address);
        timeout(config.connection_timeout, peripheral.connect())
            .await
            .map_err(|_| Error::timeout("connect to device", config.connection_timeout))?
            .map_err(|e| Error::connection_failed(&address, e.to_string()))?;
        debug!("Connected");

        // From here on the peripheral is connected, so build the Device first
        // and let Drop clean up if discovery fails.
        let mut device = Self {
            peripheral,
            name,
            address,
            characteristics: HashMap::new(),
            disconnected: AtomicBool::new(false),
            config,
        };

        timeout(
            device.config.discovery_timeout,
            device.peripheral.discover_services(),
        )
        .await
        .map_err(|_| Error::timeout("discover services", device.config.discovery_timeout))??;

        let services = device.peripheral.services();
        debug!("Found {} services", services.len());
        for service in &services {
            debug!("  Service: {}", service.uuid);
            for characteristic in &service.characteristics {
                debug!("    Characteristic: {}", characteristic.uuid);
                device
                    .characteristics
                    .insert(characteristic.uuid, characteristic.clone());
            }
        }

        Ok(device)
    }

    fn find_characteristic(&self, uuid: Uuid) -> Result<&Characteristic> {
        self.characteristics.get(&uuid).ok_or_else(|| {
            Error::characteristic_not_found(uuid.to_string(), self.peripheral.services().len())
        })
    }

    /// Read a characteristic value by UUID, bounded by the read timeout.
    pub async fn read_characteristic(&self, uuid: Uuid) -> Result<Vec<u8>> {
        let characteristic = self.find_characteristic(uuid)?;
        let data = timeout(self.config.read_timeout, self.peripheral.read(characteristic))
            .await
            .map_err(|_| {
                Error::timeout(format!("read characteristic {}", uuid), self.config.read_timeout)
            })??;
        debug!("Read {} bytes from {}", data.len(), uuid);
        Ok(data)
    }

    /// Read GAP and Device Information strings.
    ///
    /// Characteristics the device does not expose are left empty; the name
    /// falls back to the advertised name.
    #[tracing::instrument(level = "debug", skip(self), fields(address = %self.address))]
    pub async fn read_device_info(&self) -> Result<DeviceInfo> {
        let (name, firmware, manufacturer) = tokio::join!(
            self.read_characteristic(DEVICE_NAME),
            self.read_characteristic(FIRMWARE_REVISION),
            self.read_characteristic(MANUFACTURER_NAME),
        );

        let name = name
            .map(read_string)
            .unwrap_or_else(|_| self.name.clone().unwrap_or_default());

        Ok(DeviceInfo {
            name,
            firmware: firmware.map(read_string).unwrap_or_default(),
            manufacturer: manufacturer.map(read_string).unwrap_or_default(),
        })
    }

    /// Disconnect from the device.
    #[tracing::instrument(level = "debug", skip(self), fields(address = %self.address))]
    pub async fn disconnect(&self) -> Result<()> {
        if self.disconnected.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("Disconnecting");
        self.peripheral.disconnect().await?;
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if self.disconnected.swap(true, Ordering::SeqCst) {
            return;
        }

        warn!(
            device_address = %self.address,
            "Device dropped without calling disconnect() - performing best-effort cleanup"
        );

        let peripheral = self.peripheral.clone();
        let address = self.address.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = peripheral.disconnect().await {
                    debug!(device_address = %address, error = %e, "Best-effort disconnect failed");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_config_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.connection_timeout, Duration::from_secs(15));
        assert_eq!(config.read_timeout, Duration::from_secs(10));
        assert_eq!(config.discovery_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_connection_config_builder() {
        let config = ConnectionConfig::new()
            .connection_timeout(Duration::from_secs(20))
            .read_timeout(Duration::from_secs(5))
            .discovery_timeout(Duration::from_secs(7));
        assert_eq!(config.connection_timeout, Duration::from_secs(20));
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.discovery_timeout, Duration::from_secs(7));
    }
}

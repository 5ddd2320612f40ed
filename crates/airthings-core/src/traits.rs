//! Trait seams between the orchestration layer and the Bluetooth stack.
//!
//! [`Scanner`] and [`DeviceReader`] are implemented by
//! [`AirthingsClient`](crate::AirthingsClient) for real hardware and by the
//! types in [`crate::mock`] for tests.

use std::time::Duration;

use async_trait::async_trait;

use airthings_types::{DeviceReading, UnitSystem};

use crate::error::Result;
use crate::scan::DiscoveredDevice;

/// Timed BLE discovery.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Listen for advertisements for `duration` and return what was seen.
    ///
    /// An empty list is not an error.
    async fn discover(&self, duration: Duration) -> Result<Vec<DiscoveredDevice>>;
}

/// Connect-and-read against a single discovered device.
#[async_trait]
pub trait DeviceReader: Send + Sync {
    /// Read a [`DeviceReading`] from `device`, formatting unit-dependent
    /// values according to `units`.
    ///
    /// Fails with [`Error::UnsupportedDevice`](crate::Error::UnsupportedDevice)
    /// when the device is not a readable Airthings model.
    async fn update_device(
        &self,
        device: &DiscoveredDevice,
        units: UnitSystem,
    ) -> Result<DeviceReading>;
}

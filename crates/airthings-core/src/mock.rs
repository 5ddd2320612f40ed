//! Mock scanner and reader for testing without BLE hardware.
//!
//! [`MockScanner`] returns a fixed discovery result and counts how often it
//! was asked. [`MockReader`] answers per address with a reading, an
//! unsupported-device error or a generic failure, and records every attempt.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use airthings_core::{DeviceReader, DiscoveredDevice, MockReader, MockScanner, Scanner};
//! use airthings_types::UnitSystem;
//!
//! #[tokio::main]
//! async fn main() {
//!     let a = DiscoveredDevice::new("AA:AA:AA:AA:AA:AA", Some("Wave"));
//!     let scanner = MockScanner::new(vec![a.clone()]);
//!     let reader = MockReader::new().unsupported("AA:AA:AA:AA:AA:AA");
//!
//!     let devices = scanner.discover(Duration::from_secs(1)).await.unwrap();
//!     assert!(reader.update_device(&devices[0], UnitSystem::Metric).await.is_err());
//!     assert_eq!(reader.attempts().await.len(), 1);
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use airthings_types::{AirthingsModel, DeviceReading, UnitSystem};

use crate::error::{Error, Result, UnsupportedReason};
use crate::scan::DiscoveredDevice;
use crate::traits::{DeviceReader, Scanner};

/// Scanner returning a fixed list of devices.
#[derive(Debug, Default)]
pub struct MockScanner {
    devices: Vec<DiscoveredDevice>,
    fail_message: Option<String>,
    calls: AtomicU32,
    last_duration: Mutex<Option<Duration>>,
}

impl MockScanner {
    /// Create a scanner that always discovers `devices`, in order.
    pub fn new(devices: Vec<DiscoveredDevice>) -> Self {
        Self {
            devices,
            ..Default::default()
        }
    }

    /// Create a scanner whose discovery always fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Number of discovery passes requested so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Window requested by the most recent discovery pass.
    pub async fn last_duration(&self) -> Option<Duration> {
        *self.last_duration.lock().await
    }
}

#[async_trait]
impl Scanner for MockScanner {
    async fn discover(&self, duration: Duration) -> Result<Vec<DiscoveredDevice>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_duration.lock().await = Some(duration);

        match &self.fail_message {
            Some(message) => Err(Error::InvalidData(message.clone())),
            None => Ok(self.devices.clone()),
        }
    }
}

/// What a [`MockReader`] does for one address.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return this reading.
    Reading(DeviceReading),
    /// Fail with [`Error::UnsupportedDevice`].
    Unsupported,
    /// Fail with a connection error carrying this message.
    Fail(String),
}

/// Reader with scripted per-address outcomes.
///
/// Addresses without a scripted outcome get [`MockReader::sample_reading`].
#[derive(Debug, Default)]
pub struct MockReader {
    outcomes: HashMap<String, MockOutcome>,
    attempts: Mutex<Vec<(String, UnitSystem)>>,
}

impl MockReader {
    /// Create a reader that succeeds for every device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for `address` (case-insensitive).
    #[must_use]
    pub fn with_outcome(mut self, address: &str, outcome: MockOutcome) -> Self {
        self.outcomes.insert(address.to_lowercase(), outcome);
        self
    }

    /// Return `reading` for `address`.
    #[must_use]
    pub fn reading(self, address: &str, reading: DeviceReading) -> Self {
        self.with_outcome(address, MockOutcome::Reading(reading))
    }

    /// Reject `address` as unsupported.
    #[must_use]
    pub fn unsupported(self, address: &str) -> Self {
        self.with_outcome(address, MockOutcome::Unsupported)
    }

    /// Fail reads of `address` with `message`.
    #[must_use]
    pub fn failing(self, address: &str, message: &str) -> Self {
        self.with_outcome(address, MockOutcome::Fail(message.to_string()))
    }

    /// Every `(address, units)` pair passed to `update_device`, in call order.
    pub async fn attempts(&self) -> Vec<(String, UnitSystem)> {
        self.attempts.lock().await.clone()
    }

    /// Wave Plus style reading used for unscripted addresses.
    pub fn sample_reading(device: &DiscoveredDevice, units: UnitSystem) -> DeviceReading {
        let mut reading = DeviceReading::new(device.address.clone());
        reading.name = device.name.clone();
        reading.model = Some(AirthingsModel::WavePlus);
        reading.manufacturer = Some("Airthings AS".to_string());
        reading.serial = Some("2930000000".to_string());
        reading.firmware = Some("G-BLE-1.5.3".to_string());
        reading.insert_sensor("temperature", 21.5);
        reading.insert_sensor("humidity", 45.5);
        reading.insert_sensor("co2", 800u16);
        match units {
            UnitSystem::Metric => reading.insert_sensor("radon_1day_avg", 60u16),
            UnitSystem::Imperial => reading.insert_sensor("radon_1day_avg", 1.62),
        }
        reading
    }
}

#[async_trait]
impl DeviceReader for MockReader {
    async fn update_device(
        &self,
        device: &DiscoveredDevice,
        units: UnitSystem,
    ) -> Result<DeviceReading> {
        self.attempts
            .lock()
            .await
            .push((device.address.clone(), units));

        match self.outcomes.get(&device.address.to_lowercase()) {
            Some(MockOutcome::Reading(reading)) => Ok(reading.clone()),
            Some(MockOutcome::Unsupported) => Err(Error::unsupported(
                &device.address,
                UnsupportedReason::NotAirthings,
            )),
            Some(MockOutcome::Fail(message)) => {
                Err(Error::connection_failed(&device.address, message.clone()))
            }
            None => Ok(Self::sample_reading(device, units)),
        }
    }
}

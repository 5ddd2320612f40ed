//! Core BLE library for Airthings environmental monitors.
//!
//! This crate discovers nearby Bluetooth Low Energy devices, identifies
//! Airthings monitors from their advertisement data, and reads and decodes
//! their current sensor values.
//!
//! # Supported Devices
//!
//! | Device | Model number | Sensors |
//! |--------|--------------|---------|
//! | Wave Plus | 2930 | Radon, CO₂, VOC, Temperature, Humidity, Pressure, Light |
//! | Wave Radon | 2950 | Radon, Temperature, Humidity |
//! | Wave Mini | 2920 | VOC, Temperature, Humidity, Pressure, Light |
//!
//! Wave (2900), View Plus (2960) and View Radon (2989) are recognized but
//! reported as unsupported.
//!
//! # Platform Differences
//!
//! On Linux and Windows devices are identified by their MAC address. On macOS
//! CoreBluetooth hides MAC addresses, so the peripheral UUID is used instead.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use airthings_core::{AirthingsClient, DeviceReader, Scanner, UnitSystem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AirthingsClient::new();
//!     for device in client.discover(Duration::from_secs(8)).await? {
//!         match client.update_device(&device, UnitSystem::Metric).await {
//!             Ok(reading) => println!("{}: {:?}", reading.address, reading.sensors),
//!             Err(e) if e.is_unsupported() => {}
//!             Err(e) => eprintln!("{}: {}", device.address, e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod device;
pub mod error;
pub mod mock;
pub mod scan;
pub mod traits;
pub mod util;

pub use airthings_types::{
    AirthingsModel, DeviceInfo, DeviceReading, RadonLevel, SensorValue, Sensors, UnitSystem,
};

pub use client::AirthingsClient;
pub use device::{ConnectionConfig, Device};
pub use error::{DeviceNotFoundReason, Error, Result, UnsupportedReason};
pub use mock::{MockOutcome, MockReader, MockScanner};
pub use scan::{DEFAULT_SCAN_SECS, DiscoveredDevice, ScanOptions, scan_duration};
pub use traits::{DeviceReader, Scanner};

//! Bluetooth-backed [`Scanner`] and [`DeviceReader`].

use std::time::Duration;

use async_trait::async_trait;
use btleplug::platform::Adapter;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::device::{ConnectionConfig, Device};
use crate::error::{Error, Result, UnsupportedReason};
use crate::scan::{
    DiscoveredDevice, ScanOptions, find_peripheral, get_adapter, scan_with_adapter,
};
use crate::traits::{DeviceReader, Scanner};
use airthings_types::{
    AirthingsModel, DeviceInfo, DeviceReading, Sensors, UnitSystem, decode_current_values,
    parse_manufacturer_data,
};

/// Airthings BLE client.
///
/// The Bluetooth adapter is opened on first use, so constructing a client
/// performs no I/O. Discovery and reads share the same adapter, which keeps
/// the peripherals seen during a scan available for connecting.
#[derive(Default)]
pub struct AirthingsClient {
    adapter: OnceCell<Adapter>,
    config: ConnectionConfig,
}

impl std::fmt::Debug for AirthingsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirthingsClient")
            .field("adapter_ready", &self.adapter.initialized())
            .field("config", &self.config)
            .finish()
    }
}

impl AirthingsClient {
    /// Create a client with default connection timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client with custom connection timeouts.
    pub fn with_config(config: ConnectionConfig) -> Self {
        Self {
            adapter: OnceCell::new(),
            config,
        }
    }

    async fn adapter(&self) -> Result<&Adapter> {
        self.adapter.get_or_try_init(get_adapter).await
    }
}

#[async_trait]
impl Scanner for AirthingsClient {
    async fn discover(&self, duration: Duration) -> Result<Vec<DiscoveredDevice>> {
        let adapter = self.adapter().await?;
        scan_with_adapter(adapter, ScanOptions::new().duration(duration)).await
    }
}

#[async_trait]
impl DeviceReader for AirthingsClient {
    #[tracing::instrument(level = "info", skip_all, fields(address = %device.address, units = %units))]
    async fn update_device(
        &self,
        device: &DiscoveredDevice,
        units: UnitSystem,
    ) -> Result<DeviceReading> {
        let (model, serial) = identify(device)?;
        let Some(characteristic) = model.current_values_characteristic() else {
            return Err(Error::unsupported(
                &device.address,
                UnsupportedReason::NoDecoder(model),
            ));
        };
        info!("Identified {} (serial {})", model, serial);

        let adapter = self.adapter().await?;
        let peripheral = find_peripheral(adapter, &device.address)
            .await?
            .ok_or_else(|| Error::device_not_found(&device.address))?;

        let connected = Device::from_peripheral_with_config(peripheral, self.config.clone()).await?;
        let result = read_connected(&connected, model, characteristic, units).await;
        if let Err(e) = connected.disconnect().await {
            debug!("Disconnect failed: {}", e);
        }
        let (info, sensors) = result?;

        Ok(build_reading(device, model, serial, info, sensors))
    }
}

async fn read_connected(
    device: &Device,
    model: AirthingsModel,
    characteristic: uuid::Uuid,
    units: UnitSystem,
) -> Result<(DeviceInfo, Sensors)> {
    let info = device.read_device_info().await?;
    let raw = device.read_characteristic(characteristic).await?;
    let sensors = decode_current_values(model, &raw, units)?;
    Ok((info, sensors))
}

/// Identify the Airthings model and serial number from a device's advertisement.
///
/// This needs no connection, so non-Airthings devices are rejected cheaply.
pub fn identify(device: &DiscoveredDevice) -> Result<(AirthingsModel, String)> {
    let data = device
        .airthings_data()
        .ok_or_else(|| Error::unsupported(&device.address, UnsupportedReason::NotAirthings))?;

    let identity = parse_manufacturer_data(data).map_err(|e| {
        Error::unsupported(
            &device.address,
            UnsupportedReason::MalformedAdvertisement(e.to_string()),
        )
    })?;

    match identity.model {
        Some(model) => Ok((model, identity.serial)),
        None => Err(Error::unsupported(
            &device.address,
            UnsupportedReason::UnknownModel(identity.model_number().to_string()),
        )),
    }
}

fn build_reading(
    device: &DiscoveredDevice,
    model: AirthingsModel,
    serial: String,
    info: DeviceInfo,
    sensors: Sensors,
) -> DeviceReading {
    DeviceReading {
        name: non_empty(info.name).or_else(|| device.name.clone()),
        model: Some(model),
        manufacturer: non_empty(info.manufacturer),
        serial: Some(serial),
        firmware: non_empty(info.firmware),
        address: device.address.clone(),
        sensors,
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

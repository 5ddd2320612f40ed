//! Core types for Airthings sensor data.

use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use uuid::Uuid;

/// Airthings product line, identified by the first four digits of the serial number.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new models
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum AirthingsModel {
    /// First generation Wave (radon, temperature, humidity).
    Wave,
    /// Wave Mini (temperature, humidity, pressure, VOC).
    WaveMini,
    /// Wave Plus (radon, CO2, VOC, temperature, humidity, pressure).
    WavePlus,
    /// Second generation Wave, sold as Wave Radon.
    WaveRadon,
    /// View Plus.
    ViewPlus,
    /// View Radon.
    ViewRadon,
}

impl AirthingsModel {
    /// Look up a model from its four-digit model number.
    ///
    /// # Examples
    ///
    /// ```
    /// use airthings_types::AirthingsModel;
    ///
    /// assert_eq!(AirthingsModel::from_model_number("2930"), Some(AirthingsModel::WavePlus));
    /// assert_eq!(AirthingsModel::from_model_number("1234"), None);
    /// ```
    #[must_use]
    pub fn from_model_number(number: &str) -> Option<Self> {
        match number {
            "2900" => Some(Self::Wave),
            "2920" => Some(Self::WaveMini),
            "2930" => Some(Self::WavePlus),
            "2950" => Some(Self::WaveRadon),
            "2960" => Some(Self::ViewPlus),
            "2989" => Some(Self::ViewRadon),
            _ => None,
        }
    }

    /// Four-digit model number as printed on the device label.
    #[must_use]
    pub fn model_number(&self) -> &'static str {
        match self {
            Self::Wave => "2900",
            Self::WaveMini => "2920",
            Self::WavePlus => "2930",
            Self::WaveRadon => "2950",
            Self::ViewPlus => "2960",
            Self::ViewRadon => "2989",
        }
    }

    /// Marketing name of the product.
    #[must_use]
    pub fn product_name(&self) -> &'static str {
        match self {
            Self::Wave => "Wave",
            Self::WaveMini => "Wave Mini",
            Self::WavePlus => "Wave Plus",
            Self::WaveRadon => "Wave Radon",
            Self::ViewPlus => "View Plus",
            Self::ViewRadon => "View Radon",
        }
    }

    /// GATT characteristic holding the current sensor values, for models this
    /// crate can decode.
    #[must_use]
    pub fn current_values_characteristic(&self) -> Option<Uuid> {
        match self {
            Self::WavePlus => Some(crate::uuid::WAVE_PLUS_CURRENT_VALUES),
            Self::WaveRadon => Some(crate::uuid::WAVE_RADON_CURRENT_VALUES),
            Self::WaveMini => Some(crate::uuid::WAVE_MINI_CURRENT_VALUES),
            Self::Wave | Self::ViewPlus | Self::ViewRadon => None,
        }
    }

    /// Whether current values of this model can be read and decoded.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.current_values_characteristic().is_some()
    }
}

impl fmt::Display for AirthingsModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.product_name())
    }
}

/// Display convention for unit-dependent sensor values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnitSystem {
    /// SI units (Bq/m³ for radon).
    #[default]
    Metric,
    /// US customary units (pCi/L for radon).
    Imperial,
}

impl UnitSystem {
    /// Map an `--imperial` style flag to a unit system.
    #[must_use]
    pub fn from_imperial(imperial: bool) -> Self {
        if imperial {
            Self::Imperial
        } else {
            Self::Metric
        }
    }

    /// True for [`UnitSystem::Metric`].
    #[must_use]
    pub fn is_metric(&self) -> bool {
        matches!(self, Self::Metric)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

/// Radon exposure category derived from a concentration in Bq/m³.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RadonLevel {
    /// 0-49 Bq/m³.
    VeryLow,
    /// 50-99 Bq/m³.
    Low,
    /// 100-299 Bq/m³.
    Moderate,
    /// 300 Bq/m³ and above.
    High,
}

impl RadonLevel {
    /// Categorize a radon concentration.
    ///
    /// ```
    /// use airthings_types::RadonLevel;
    ///
    /// assert_eq!(RadonLevel::from_bq(49), RadonLevel::VeryLow);
    /// assert_eq!(RadonLevel::from_bq(300), RadonLevel::High);
    /// ```
    #[must_use]
    pub fn from_bq(bq: u16) -> Self {
        match bq {
            0..=49 => Self::VeryLow,
            50..=99 => Self::Low,
            100..=299 => Self::Moderate,
            _ => Self::High,
        }
    }

    /// Lowercase label used as the sensor value.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RadonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single sensor value, either numeric or textual.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SensorValue {
    /// Whole-number measurement (ppm, ppb, Bq/m³, lux).
    Integer(i64),
    /// Fractional measurement (°C, %, hPa, pCi/L).
    Float(f64),
    /// Categorical value such as a radon level.
    Text(String),
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            // Keep a trailing ".0" so whole floats stay distinguishable from counts.
            Self::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for SensorValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u16> for SensorValue {
    fn from(value: u16) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for SensorValue {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for SensorValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SensorValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SensorValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Sensor values keyed by sensor name. Keys are unique and iterate in sorted order.
pub type Sensors = BTreeMap<String, SensorValue>;

/// Strings read from the GAP and Device Information services.
///
/// Model and serial come from the advertisement, so they are not read here.
///
/// Fields are empty when the device does not expose the characteristic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceInfo {
    /// GAP device name.
    pub name: String,
    /// Firmware revision string.
    pub firmware: String,
    /// Manufacturer name string.
    pub manufacturer: String,
}

/// Decoded snapshot of one Airthings device.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceReading {
    /// Advertised or GAP device name.
    pub name: Option<String>,
    /// Product model, if identified.
    pub model: Option<AirthingsModel>,
    /// Manufacturer string from the Device Information service.
    pub manufacturer: Option<String>,
    /// Serial number.
    pub serial: Option<String>,
    /// Firmware revision.
    pub firmware: Option<String>,
    /// Address (MAC, or platform identifier where MACs are hidden).
    pub address: String,
    /// Sensor name to value.
    pub sensors: Sensors,
}

impl DeviceReading {
    /// Create an empty reading for the device at `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Insert or replace a sensor value.
    pub fn insert_sensor(&mut self, name: impl Into<String>, value: impl Into<SensorValue>) {
        self.sensors.insert(name.into(), value.into());
    }

    /// Product name of the model, if known.
    pub fn product_name(&self) -> Option<&'static str> {
        self.model.map(|m| m.product_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_number_round_trip() {
        for model in [
            AirthingsModel::Wave,
            AirthingsModel::WaveMini,
            AirthingsModel::WavePlus,
            AirthingsModel::WaveRadon,
            AirthingsModel::ViewPlus,
            AirthingsModel::ViewRadon,
        ] {
            assert_eq!(AirthingsModel::from_model_number(model.model_number()), Some(model));
        }
    }

    #[test]
    fn test_supported_models() {
        assert!(AirthingsModel::WavePlus.is_supported());
        assert!(AirthingsModel::WaveRadon.is_supported());
        assert!(AirthingsModel::WaveMini.is_supported());
        assert!(!AirthingsModel::Wave.is_supported());
        assert!(!AirthingsModel::ViewPlus.is_supported());
    }

    #[test]
    fn test_model_display_is_product_name() {
        assert_eq!(AirthingsModel::WaveRadon.to_string(), "Wave Radon");
    }

    #[test]
    fn test_unit_system_from_flag() {
        assert_eq!(UnitSystem::from_imperial(false), UnitSystem::Metric);
        assert_eq!(UnitSystem::from_imperial(true), UnitSystem::Imperial);
        assert!(UnitSystem::default().is_metric());
    }

    #[test]
    fn test_radon_level_boundaries() {
        assert_eq!(RadonLevel::from_bq(0), RadonLevel::VeryLow);
        assert_eq!(RadonLevel::from_bq(50), RadonLevel::Low);
        assert_eq!(RadonLevel::from_bq(99), RadonLevel::Low);
        assert_eq!(RadonLevel::from_bq(100), RadonLevel::Moderate);
        assert_eq!(RadonLevel::from_bq(299), RadonLevel::Moderate);
        assert_eq!(RadonLevel::from_bq(u16::MAX), RadonLevel::High);
    }

    #[test]
    fn test_sensor_value_display() {
        assert_eq!(SensorValue::Integer(812).to_string(), "812");
        assert_eq!(SensorValue::Float(21.37).to_string(), "21.37");
        assert_eq!(SensorValue::Float(45.0).to_string(), "45.0");
        assert_eq!(SensorValue::from("low").to_string(), "low");
    }

    #[test]
    fn test_sensor_keys_unique_and_sorted() {
        let mut reading = DeviceReading::new("AA:BB:CC:DD:EE:FF");
        reading.insert_sensor("voc", 120u16);
        reading.insert_sensor("co2", 800u16);
        reading.insert_sensor("co2", 810u16);

        let keys: Vec<_> = reading.sensors.keys().cloned().collect();
        assert_eq!(keys, vec!["co2", "voc"]);
        assert_eq!(reading.sensors["co2"], SensorValue::Integer(810));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_sensor_value_serializes_untagged() {
        let json = serde_json::to_string(&SensorValue::Float(21.5)).unwrap();
        assert_eq!(json, "21.5");
        let json = serde_json::to_string(&SensorValue::from("high")).unwrap();
        assert_eq!(json, "\"high\"");
    }
}

//! Decoding of Airthings advertisement and current-values payloads.
//!
//! All multi-byte fields are little-endian.

use bytes::Buf;

use crate::error::{ParseError, ParseResult};
use crate::types::{AirthingsModel, RadonLevel, SensorValue, Sensors, UnitSystem};

/// Size of every supported current-values payload.
pub const CURRENT_VALUES_LEN: usize = 20;

/// Radon readings above this are sensor error codes, not concentrations.
pub const RADON_MAX_VALID: u16 = 16383;

/// Conversion factor from Bq/m³ to pCi/L.
pub const BQ_TO_PCI: f64 = 0.027;

/// Payload version understood by the Wave Plus and Wave Radon decoders.
const SENSOR_VERSION: u8 = 1;

/// Identity carried in Airthings manufacturer-specific advertisement data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisedIdentity {
    /// Full serial number.
    pub serial: String,
    /// Model derived from the first four digits of the serial.
    pub model: Option<AirthingsModel>,
}

impl AdvertisedIdentity {
    /// Model number prefix of the serial.
    pub fn model_number(&self) -> &str {
        self.serial.get(..4).unwrap_or(&self.serial)
    }
}

/// Parse the manufacturer data advertised under [`crate::uuid::MANUFACTURER_ID`].
///
/// Bytes 0-3 hold the serial number as a little-endian u32. The payload may
/// carry trailing bytes, which are ignored.
///
/// # Examples
///
/// ```
/// use airthings_types::{AirthingsModel, decode::parse_manufacturer_data};
///
/// let serial: u32 = 2930012345;
/// let identity = parse_manufacturer_data(&serial.to_le_bytes()).unwrap();
/// assert_eq!(identity.serial, "2930012345");
/// assert_eq!(identity.model, Some(AirthingsModel::WavePlus));
/// ```
pub fn parse_manufacturer_data(data: &[u8]) -> ParseResult<AdvertisedIdentity> {
    if data.len() < 4 {
        return Err(ParseError::InsufficientBytes {
            expected: 4,
            actual: data.len(),
        });
    }

    let mut buf = data;
    let serial = buf.get_u32_le().to_string();
    let model = serial.get(..4).and_then(AirthingsModel::from_model_number);

    Ok(AdvertisedIdentity { serial, model })
}

/// Decode the current-values characteristic of `model`.
pub fn decode_current_values(
    model: AirthingsModel,
    data: &[u8],
    units: UnitSystem,
) -> ParseResult<Sensors> {
    match model {
        AirthingsModel::WavePlus => decode_wave_plus(data, units),
        AirthingsModel::WaveRadon => decode_wave_radon(data, units),
        AirthingsModel::WaveMini => decode_wave_mini(data),
        other => Err(ParseError::InvalidValue(format!(
            "no current-values decoder for {other}"
        ))),
    }
}

/// Decode a Wave Plus payload.
///
/// Layout (20 bytes):
/// - byte 0: payload version (1)
/// - byte 1: humidity (raw / 2 = %)
/// - byte 2: ambient light
/// - byte 3: reserved
/// - bytes 4-5: radon 24h average (Bq/m³)
/// - bytes 6-7: radon long-term average (Bq/m³)
/// - bytes 8-9: temperature (raw / 100 = °C)
/// - bytes 10-11: pressure (raw / 50 = hPa)
/// - bytes 12-13: CO2 (ppm)
/// - bytes 14-15: VOC (ppb)
/// - bytes 16-19: reserved
pub fn decode_wave_plus(data: &[u8], units: UnitSystem) -> ParseResult<Sensors> {
    require_len(data)?;

    let mut buf = data;
    let version = buf.get_u8();
    if version != SENSOR_VERSION {
        return Err(ParseError::UnsupportedVersion(version));
    }
    let humidity = buf.get_u8();
    let illuminance = buf.get_u8();
    buf.advance(1);
    let radon_1day = buf.get_u16_le();
    let radon_longterm = buf.get_u16_le();
    let temperature = buf.get_u16_le();
    let pressure = buf.get_u16_le();
    let co2 = buf.get_u16_le();
    let voc = buf.get_u16_le();

    let mut sensors = Sensors::new();
    insert(&mut sensors, "humidity", f64::from(humidity) / 2.0);
    insert(&mut sensors, "illuminance", illuminance);
    insert_radon(&mut sensors, "radon_1day", radon_1day, units);
    insert_radon(&mut sensors, "radon_longterm", radon_longterm, units);
    insert(&mut sensors, "temperature", round2(f64::from(temperature) / 100.0));
    insert(&mut sensors, "pressure", round2(f64::from(pressure) / 50.0));
    insert(&mut sensors, "co2", co2);
    insert(&mut sensors, "voc", voc);
    Ok(sensors)
}

/// Decode a Wave Radon (2nd generation Wave) payload.
///
/// Layout (20 bytes):
/// - byte 0: payload version (1)
/// - byte 1: humidity (raw / 2 = %)
/// - bytes 2-3: reserved
/// - bytes 4-5: radon 24h average (Bq/m³)
/// - bytes 6-7: radon long-term average (Bq/m³)
/// - bytes 8-9: temperature (raw / 100 = °C)
/// - bytes 10-19: reserved
pub fn decode_wave_radon(data: &[u8], units: UnitSystem) -> ParseResult<Sensors> {
    require_len(data)?;

    let mut buf = data;
    let version = buf.get_u8();
    if version != SENSOR_VERSION {
        return Err(ParseError::UnsupportedVersion(version));
    }
    let humidity = buf.get_u8();
    buf.advance(2);
    let radon_1day = buf.get_u16_le();
    let radon_longterm = buf.get_u16_le();
    let temperature = buf.get_u16_le();

    let mut sensors = Sensors::new();
    insert(&mut sensors, "humidity", f64::from(humidity) / 2.0);
    insert_radon(&mut sensors, "radon_1day", radon_1day, units);
    insert_radon(&mut sensors, "radon_longterm", radon_longterm, units);
    insert(&mut sensors, "temperature", round2(f64::from(temperature) / 100.0));
    Ok(sensors)
}

/// Decode a Wave Mini payload.
///
/// Layout (20 bytes):
/// - bytes 0-1: ambient light
/// - bytes 2-3: temperature (raw / 100 = K)
/// - bytes 4-5: pressure (raw / 50 = hPa)
/// - bytes 6-7: humidity (raw / 100 = %)
/// - bytes 8-9: VOC (ppb)
/// - bytes 10-19: reserved
pub fn decode_wave_mini(data: &[u8]) -> ParseResult<Sensors> {
    require_len(data)?;

    let mut buf = data;
    let illuminance = buf.get_u16_le();
    let temperature = buf.get_u16_le();
    let pressure = buf.get_u16_le();
    let humidity = buf.get_u16_le();
    let voc = buf.get_u16_le();

    let mut sensors = Sensors::new();
    insert(&mut sensors, "illuminance", illuminance);
    insert(
        &mut sensors,
        "temperature",
        round2(f64::from(temperature) / 100.0 - 273.15),
    );
    insert(&mut sensors, "pressure", round2(f64::from(pressure) / 50.0));
    insert(&mut sensors, "humidity", round2(f64::from(humidity) / 100.0));
    insert(&mut sensors, "voc", voc);
    Ok(sensors)
}

fn require_len(data: &[u8]) -> ParseResult<()> {
    if data.len() < CURRENT_VALUES_LEN {
        return Err(ParseError::InsufficientBytes {
            expected: CURRENT_VALUES_LEN,
            actual: data.len(),
        });
    }
    Ok(())
}

fn insert(sensors: &mut Sensors, name: &str, value: impl Into<SensorValue>) {
    sensors.insert(name.to_string(), value.into());
}

/// Insert `<prefix>_avg` and `<prefix>_level`, skipping error codes.
fn insert_radon(sensors: &mut Sensors, prefix: &str, bq: u16, units: UnitSystem) {
    if bq > RADON_MAX_VALID {
        return;
    }
    let value = match units {
        UnitSystem::Metric => SensorValue::from(bq),
        UnitSystem::Imperial => SensorValue::Float(round2(f64::from(bq) * BQ_TO_PCI)),
    };
    sensors.insert(format!("{prefix}_avg"), value);
    sensors.insert(
        format!("{prefix}_level"),
        SensorValue::from(RadonLevel::from_bq(bq).label()),
    );
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

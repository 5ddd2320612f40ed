//! Platform-agnostic types for Airthings environmental monitors.
//!
//! This crate holds everything that does not need a Bluetooth stack:
//!
//! - Device models and the unit system
//! - The [`DeviceReading`] snapshot and its sensor values
//! - UUID constants and the Airthings company id
//! - Decoding of advertisement and current-values payloads
//!
//! # Example
//!
//! ```
//! use airthings_types::{AirthingsModel, UnitSystem, decode};
//!
//! let mut payload = [0u8; 20];
//! payload[0] = 1; // payload version
//! let sensors = decode::decode_current_values(AirthingsModel::WavePlus, &payload, UnitSystem::Metric)
//!     .unwrap();
//! assert!(sensors.contains_key("co2"));
//! ```

pub mod decode;
pub mod error;
pub mod types;
pub mod uuid;

pub use decode::{AdvertisedIdentity, decode_current_values, parse_manufacturer_data};
pub use error::{ParseError, ParseResult};
pub use types::{
    AirthingsModel, DeviceInfo, DeviceReading, RadonLevel, SensorValue, Sensors, UnitSystem,
};
pub use self::uuid as uuids;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn manufacturer_data_never_panics(data in proptest::collection::vec(any::<u8>(), 0..32)) {
            let result = parse_manufacturer_data(&data);
            prop_assert_eq!(result.is_ok(), data.len() >= 4);
        }

        #[test]
        fn decoders_never_panic(data in proptest::collection::vec(any::<u8>(), 0..40)) {
            for model in [AirthingsModel::WavePlus, AirthingsModel::WaveRadon, AirthingsModel::WaveMini] {
                let _ = decode_current_values(model, &data, UnitSystem::Metric);
                let _ = decode_current_values(model, &data, UnitSystem::Imperial);
            }
        }

        #[test]
        fn wave_mini_accepts_any_full_payload(data in proptest::collection::vec(any::<u8>(), 20..40)) {
            let sensors = decode::decode_wave_mini(&data).unwrap();
            prop_assert_eq!(sensors.len(), 5);
        }

        #[test]
        fn radon_level_is_monotonic(a in any::<u16>(), b in any::<u16>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(RadonLevel::from_bq(lo) <= RadonLevel::from_bq(hi));
        }

        #[test]
        fn serial_prefix_matches_model(serial in 2_930_000_000u32..2_931_000_000u32) {
            let identity = parse_manufacturer_data(&serial.to_le_bytes()).unwrap();
            prop_assert_eq!(identity.model, Some(AirthingsModel::WavePlus));
        }
    }
}

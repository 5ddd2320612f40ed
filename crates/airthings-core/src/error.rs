//! Error types for airthings-core.
//!
//! This module defines the errors that can occur while discovering and
//! reading Airthings devices over Bluetooth Low Energy.
//!
//! Callers that process several devices in one pass usually split errors
//! into two groups with [`Error::is_unsupported`]:
//!
//! | Error Type | Meaning |
//! |------------|---------|
//! | [`Error::UnsupportedDevice`] | The device is not an Airthings monitor this crate can decode |
//! | everything else | Transport, timeout or payload failure while reading a supported device |
//!
//! [`Error::InvalidConfig`] is raised before any Bluetooth I/O and should be
//! reported to the user rather than logged per device.

use std::time::Duration;

use thiserror::Error;

use airthings_types::{AirthingsModel, ParseError};

/// Errors that can occur when communicating with Airthings devices.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Bluetooth Low Energy error.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Device or adapter not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// The device does not match the Airthings manufacturer/protocol signature.
    #[error("Unsupported device at {address}: {reason}")]
    UnsupportedDevice {
        /// Address of the rejected device.
        address: String,
        /// Why the device was rejected.
        reason: UnsupportedReason,
    },

    /// Connecting to the device failed.
    #[error("Connection to {device_id} failed: {reason}")]
    ConnectionFailed {
        /// The device identifier that failed to connect.
        device_id: String,
        /// Description of the failure.
        reason: String,
    },

    /// Required BLE characteristic not found on device.
    #[error("Characteristic not found: {uuid} (searched in {service_count} services)")]
    CharacteristicNotFound {
        /// The UUID that was not found.
        uuid: String,
        /// Number of services that were searched.
        service_count: usize,
    },

    /// Failed to parse data received from device.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Payload shorter than the reading layout requires.
    #[error("Invalid reading format: expected {expected} bytes, got {actual}")]
    InvalidReadingFormat {
        /// Expected data size.
        expected: usize,
        /// Actual data size received.
        actual: usize,
    },

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Reason why a device was not found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// Device with the specified address is not known to the adapter.
    NotFound { identifier: String },
    /// No Bluetooth adapter available.
    NoAdapter,
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { identifier } => write!(f, "device '{}' not found", identifier),
            Self::NoAdapter => write!(f, "no Bluetooth adapter available"),
        }
    }
}

/// Reason why a device was classified as unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UnsupportedReason {
    /// No Airthings manufacturer data in the advertisement.
    NotAirthings,
    /// Airthings manufacturer data that could not be parsed.
    MalformedAdvertisement(String),
    /// Serial number prefix does not match a known model.
    UnknownModel(String),
    /// Known model without a current-values decoder.
    NoDecoder(AirthingsModel),
}

impl std::fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAirthings => write!(f, "not an Airthings device"),
            Self::MalformedAdvertisement(msg) => write!(f, "malformed advertisement: {}", msg),
            Self::UnknownModel(number) => write!(f, "unknown model number '{}'", number),
            Self::NoDecoder(model) => write!(f, "{} is not supported", model),
        }
    }
}

impl Error {
    /// Create a device not found error for a specific identifier.
    pub fn device_not_found(identifier: impl Into<String>) -> Self {
        Self::DeviceNotFound(DeviceNotFoundReason::NotFound {
            identifier: identifier.into(),
        })
    }

    /// Create an unsupported device error.
    pub fn unsupported(address: impl Into<String>, reason: UnsupportedReason) -> Self {
        Self::UnsupportedDevice {
            address: address.into(),
            reason,
        }
    }

    /// Create a connection failure.
    pub fn connection_failed(device_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            device_id: device_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a characteristic not found error.
    pub fn characteristic_not_found(uuid: impl Into<String>, service_count: usize) -> Self {
        Self::CharacteristicNotFound {
            uuid: uuid.into(),
            service_count,
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether this error means "not a device we can read" rather than a failed read.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedDevice { .. })
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InsufficientBytes { expected, actual } => {
                Error::InvalidReadingFormat { expected, actual }
            }
            ParseError::UnsupportedVersion(version) => {
                Error::InvalidData(format!("Unsupported sensor payload version {}", version))
            }
            ParseError::InvalidValue(msg) => Error::InvalidData(msg),
            // Handle future ParseError variants (non_exhaustive)
            _ => Error::InvalidData(format!("Parse error: {}", err)),
        }
    }
}

/// Result type alias using airthings-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::device_not_found("AA:BB:CC:DD:EE:FF");
        assert!(err.to_string().contains("AA:BB:CC:DD:EE:FF"));

        let err = Error::characteristic_not_found("b42e2a68", 4);
        assert!(err.to_string().contains("b42e2a68"));
        assert!(err.to_string().contains("4 services"));

        let err = Error::timeout("connect to device", Duration::from_secs(15));
        assert!(err.to_string().contains("connect to device"));
        assert!(err.to_string().contains("15s"));

        let err = Error::invalid_config("timeout must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: timeout must be positive"
        );
    }

    #[test]
    fn test_unsupported_classification() {
        let err = Error::unsupported("AA:BB", UnsupportedReason::NotAirthings);
        assert!(err.is_unsupported());
        assert_eq!(
            err.to_string(),
            "Unsupported device at AA:BB: not an Airthings device"
        );

        let err = Error::unsupported("AA:BB", UnsupportedReason::NoDecoder(AirthingsModel::ViewPlus));
        assert!(err.to_string().contains("View Plus is not supported"));

        assert!(!Error::connection_failed("AA:BB", "refused").is_unsupported());
        assert!(!Error::InvalidData("x".into()).is_unsupported());
    }

    #[test]
    fn test_device_not_found_reasons() {
        let err = Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter);
        assert!(err.to_string().contains("no Bluetooth adapter"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: Error = ParseError::InsufficientBytes {
            expected: 20,
            actual: 3,
        }
        .into();
        assert!(matches!(
            err,
            Error::InvalidReadingFormat {
                expected: 20,
                actual: 3
            }
        ));

        let err: Error = ParseError::UnsupportedVersion(7).into();
        assert!(err.to_string().contains("version 7"));
    }

    #[test]
    fn test_btleplug_error_conversion() {
        // btleplug::Error has no public constructors for most variants,
        // so only check that the From impl exists.
        fn _assert_from_impl<T: From<btleplug::Error>>() {}
        _assert_from_impl::<Error>();
    }
}

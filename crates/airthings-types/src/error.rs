//! Error types for payload parsing in airthings-types.

use thiserror::Error;

/// Errors that can occur when decoding Airthings advertisement or GATT data.
///
/// This error type is platform-agnostic and does not include
/// BLE-specific errors (those belong in airthings-core).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Payload shorter than the layout requires.
    #[error("Payload requires {expected} bytes, got {actual}")]
    InsufficientBytes {
        /// Minimum number of bytes for the layout.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },

    /// The sensor reported a payload version this decoder does not understand.
    #[error("Unsupported sensor payload version {0}")]
    UnsupportedVersion(u8),

    /// A field held a value outside its valid range.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result type alias using airthings-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

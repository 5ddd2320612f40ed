//! Utility functions for airthings-core.

use btleplug::platform::PeripheralId;

/// Address reported by platforms that hide the Bluetooth MAC (macOS).
pub const HIDDEN_ADDRESS: &str = "00:00:00:00:00:00";

/// Format a peripheral ID as a string.
///
/// On macOS, peripheral IDs are UUIDs. On other platforms they wrap the
/// MAC address. The `PeripheralId(...)` wrapper is stripped.
pub fn format_peripheral_id(id: &PeripheralId) -> String {
    strip_peripheral_wrapper(&format!("{:?}", id))
}

/// Create an identifier string from an address and peripheral ID.
///
/// On macOS where addresses are 00:00:00:00:00:00, uses the peripheral ID.
/// On other platforms, uses the Bluetooth address.
pub fn create_identifier(address: &str, peripheral_id: &PeripheralId) -> String {
    if address == HIDDEN_ADDRESS {
        format_peripheral_id(peripheral_id)
    } else {
        address.to_string()
    }
}

/// Compare two device addresses ignoring ASCII case.
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Decode a GATT string characteristic, dropping trailing NULs.
pub fn read_string(data: Vec<u8>) -> String {
    String::from_utf8(data)
        .unwrap_or_default()
        .trim_end_matches('\0')
        .to_string()
}

fn strip_peripheral_wrapper(debug: &str) -> String {
    debug
        .trim_start_matches("PeripheralId(")
        .trim_end_matches(')')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_peripheral_wrapper() {
        assert_eq!(
            strip_peripheral_wrapper("PeripheralId(AA:BB:CC:DD:EE:FF)"),
            "AA:BB:CC:DD:EE:FF"
        );
        assert_eq!(strip_peripheral_wrapper("plain"), "plain");
    }

    #[test]
    fn test_addresses_match_ignores_case() {
        assert!(addresses_match("aa:bb:cc:dd:ee:ff", "AA:BB:CC:DD:EE:FF"));
        assert!(!addresses_match("AA:BB:CC:DD:EE:FF", "AA:BB:CC:DD:EE:00"));
    }

    #[test]
    fn test_read_string_trims_nul_padding() {
        assert_eq!(read_string(b"Airthings AS\0\0".to_vec()), "Airthings AS");
        assert_eq!(read_string(vec![0xFF, 0xFE]), "");
    }
}

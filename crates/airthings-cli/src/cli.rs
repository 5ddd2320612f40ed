//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Output format for readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable blocks on stdout
    #[default]
    Text,
    /// One JSON object per reading on stdout, status lines on stderr
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "airthings")]
#[command(
    author,
    version,
    about = "Scan for BLE devices and read Airthings environmental monitors",
    long_about = None
)]
pub struct Cli {
    /// Bluetooth address to connect to (scans and reads every device if omitted)
    #[arg(short, long, env = "AIRTHINGS_DEVICE")]
    pub connect: Option<String>,

    /// Scan timeout in seconds [default: 8]
    #[arg(short, long, allow_negative_numbers = true)]
    pub timeout: Option<f64>,

    /// Show non-metric units when applicable
    #[arg(long)]
    pub imperial: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["airthings"]).unwrap();
        assert_eq!(cli.timeout, None);
        assert!(!cli.imperial);
        assert!(!cli.debug);
        assert_eq!(cli.format, None);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["airthings", "-c", "AA:BB:CC:DD:EE:FF", "-t", "2.5"]).unwrap();
        assert_eq!(cli.connect.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(cli.timeout, Some(2.5));
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "airthings",
            "--connect",
            "aa:bb:cc:dd:ee:ff",
            "--timeout",
            "12",
            "--imperial",
            "--debug",
            "--format",
            "json",
            "--config",
            "/tmp/airthings.toml",
        ])
        .unwrap();
        assert_eq!(cli.connect.as_deref(), Some("aa:bb:cc:dd:ee:ff"));
        assert_eq!(cli.timeout, Some(12.0));
        assert!(cli.imperial);
        assert!(cli.debug);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/airthings.toml")));
    }

    #[test]
    fn test_negative_timeout_parses() {
        // Rejected later by scan validation, not by the parser.
        let cli = Cli::try_parse_from(["airthings", "--timeout", "-1"]).unwrap();
        assert_eq!(cli.timeout, Some(-1.0));
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["airthings", "--timeout", "soon"]).is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["airthings", "--format", "csv"]).is_err());
    }
}

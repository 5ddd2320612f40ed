//! Command-line tool for Airthings environmental monitors.
//!
//! Scans for nearby Bluetooth Low Energy devices and reads the current sensor
//! values of every Airthings Wave Plus, Wave Radon and Wave Mini it finds.
//!
//! # Modes
//!
//! | Invocation | Behavior |
//! |------------|----------|
//! | `airthings` | Scan, list every device found, then try to read each one |
//! | `airthings --connect <address>` | Scan, then read only the matching device |
//!
//! # Output Formats
//!
//! - **Text** (default): one block per device with its info and sorted sensors
//! - **JSON**: one compact object per reading on stdout, status lines on stderr
//!
//! # Configuration
//!
//! Defaults are read from `~/.config/airthings/config.toml` (or platform
//! equivalent), overridden by `AIRTHINGS_DEVICE` and then by flags:
//!
//! ```toml
//! device = "AA:BB:CC:DD:EE:FF"
//! timeout = 10.0
//! imperial = false
//! format = "text"
//! ```
//!
//! # Examples
//!
//! Scan and read everything nearby:
//! ```bash
//! airthings --timeout 8
//! ```
//!
//! Read one device in imperial units as JSON:
//! ```bash
//! airthings --connect AA:BB:CC:DD:EE:FF --imperial --format json
//! ```

pub mod cli;
pub mod config;
pub mod format;
pub mod runner;

pub use airthings_core;
pub use airthings_types;

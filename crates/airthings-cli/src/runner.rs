//! Scan and read orchestration.
//!
//! Every run is a single linear pass: discover, optionally pick one target,
//! read each candidate, then print or log the outcome. Per-device problems
//! never abort the run; only configuration, adapter and scan errors do.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error};

use airthings_core::{DeviceReader, DiscoveredDevice, Scanner, scan_duration};
use airthings_types::{DeviceReading, UnitSystem};

use crate::cli::OutputFormat;
use crate::format::{format_device_line, format_reading_json, format_reading_text};

/// Result of reading one device.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Success(DeviceReading),
    /// Not an Airthings device, or a model that cannot be decoded.
    Unsupported(String),
    /// Any other transport or protocol error.
    Failure(String),
}

/// Destination for everything a run prints or logs.
pub trait Reporter: Send {
    /// Progress and informational lines.
    fn status(&mut self, message: &str) -> io::Result<()>;

    /// A successfully decoded reading.
    fn reading(&mut self, reading: &DeviceReading) -> io::Result<()>;

    /// A device that is not a readable Airthings monitor.
    fn unsupported(&mut self, device: &DiscoveredDevice, reason: &str);

    /// A device whose read failed.
    fn failure(&mut self, device: &DiscoveredDevice, message: &str);
}

/// Prints to the terminal and logs failures through `tracing`.
///
/// In JSON mode readings are the only thing written to `out`; status lines
/// go to `err`.
#[derive(Debug)]
pub struct ConsoleReporter<O = io::Stdout, E = io::Stderr> {
    format: OutputFormat,
    out: O,
    err: E,
}

impl ConsoleReporter {
    /// Reporter writing to the process stdout and stderr.
    pub fn new(format: OutputFormat) -> Self {
        Self::with_writers(format, io::stdout(), io::stderr())
    }
}

impl<O: Write + Send, E: Write + Send> ConsoleReporter<O, E> {
    pub fn with_writers(format: OutputFormat, out: O, err: E) -> Self {
        Self { format, out, err }
    }

    /// Consume the reporter, returning its writers.
    pub fn into_writers(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write + Send, E: Write + Send> Reporter for ConsoleReporter<O, E> {
    fn status(&mut self, message: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", message),
            OutputFormat::Json => writeln!(self.err, "{}", message),
        }
    }

    fn reading(&mut self, reading: &DeviceReading) -> io::Result<()> {
        let output = match self.format {
            OutputFormat::Text => format_reading_text(reading),
            OutputFormat::Json => format_reading_json(reading)? + "\n",
        };
        self.out.write_all(output.as_bytes())?;
        self.out.flush()
    }

    fn unsupported(&mut self, device: &DiscoveredDevice, reason: &str) {
        error!(address = %device.address, %reason, "Unsupported Airthings device at {}", device.address);
    }

    fn failure(&mut self, device: &DiscoveredDevice, message: &str) {
        error!(address = %device.address, "Error reading {}: {}", device.address, message);
    }
}

/// Counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub unsupported: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &ReadOutcome) {
        self.attempted += 1;
        match outcome {
            ReadOutcome::Success(_) => self.succeeded += 1,
            ReadOutcome::Unsupported(_) => self.unsupported += 1,
            ReadOutcome::Failure(_) => self.failed += 1,
        }
    }
}

/// Validate a timeout in seconds and turn it into a discovery window.
pub fn scan_window(timeout_secs: f64) -> Result<Duration> {
    scan_duration(timeout_secs).context("Invalid scan timeout")
}

/// Run one discovery pass over `window`.
pub async fn discover(scanner: &dyn Scanner, window: Duration) -> Result<Vec<DiscoveredDevice>> {
    let devices = scanner
        .discover(window)
        .await
        .context("BLE scan failed")?;
    debug!("Discovered {} device(s)", devices.len());
    Ok(devices)
}

/// Read a single device, folding errors into the outcome.
#[tracing::instrument(level = "debug", skip_all, fields(address = %device.address, units = %units))]
pub async fn read_one(
    reader: &dyn DeviceReader,
    device: &DiscoveredDevice,
    units: UnitSystem,
) -> ReadOutcome {
    match reader.update_device(device, units).await {
        Ok(reading) => ReadOutcome::Success(reading),
        Err(e) if e.is_unsupported() => ReadOutcome::Unsupported(e.to_string()),
        Err(e) => ReadOutcome::Failure(e.to_string()),
    }
}

fn report_outcome(
    outcome: &ReadOutcome,
    device: &DiscoveredDevice,
    reporter: &mut dyn Reporter,
) -> io::Result<()> {
    match outcome {
        ReadOutcome::Success(reading) => reporter.reading(reading)?,
        ReadOutcome::Unsupported(reason) => reporter.unsupported(device, reason),
        ReadOutcome::Failure(message) => reporter.failure(device, message),
    }
    Ok(())
}

/// Discover, then read only the device whose address matches `address`
/// (case-insensitive).
///
/// A target missing from the scan is reported and is not an error. Nothing
/// is printed before the target is found or reported missing.
pub async fn run_targeted(
    scanner: &dyn Scanner,
    reader: &dyn DeviceReader,
    address: &str,
    timeout_secs: f64,
    units: UnitSystem,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary> {
    let window = scan_window(timeout_secs)?;
    let devices = discover(scanner, window).await?;
    let mut summary = RunSummary {
        discovered: devices.len(),
        ..Default::default()
    };

    let Some(target) = devices.iter().find(|d| d.matches_address(address)) else {
        reporter.status(&format!("Device with address {} not found during scan.", address))?;
        reporter.status("Run without --connect to list available addresses.")?;
        debug!(?summary, "Run complete");
        return Ok(summary);
    };

    reporter.status(&format!("Connecting to {} ...", target.address))?;
    let outcome = read_one(reader, target, units).await;
    summary.record(&outcome);
    report_outcome(&outcome, target, reporter)?;

    debug!(?summary, "Run complete");
    Ok(summary)
}

/// Discover, list what was found, then read every device in discovery order.
pub async fn run_auto_discover(
    scanner: &dyn Scanner,
    reader: &dyn DeviceReader,
    timeout_secs: f64,
    units: UnitSystem,
    reporter: &mut dyn Reporter,
) -> Result<RunSummary> {
    let window = scan_window(timeout_secs)?;
    reporter.status(&format!(
        "Scanning for BLE devices for {} seconds...",
        timeout_secs
    ))?;
    let devices = discover(scanner, window).await?;
    let mut summary = RunSummary {
        discovered: devices.len(),
        ..Default::default()
    };

    if devices.is_empty() {
        reporter.status("No BLE devices found")?;
        debug!(?summary, "Run complete");
        return Ok(summary);
    }

    reporter.status(&format!("Found {} device(s)", devices.len()))?;
    for device in &devices {
        reporter.status(&format_device_line(device))?;
    }

    for device in &devices {
        reporter.status(&format!(
            "Attempting to read {} ({})",
            device.address,
            device.display_name()
        ))?;
        let outcome = read_one(reader, device, units).await;
        summary.record(&outcome);
        report_outcome(&outcome, device, reporter)?;
    }

    debug!(?summary, "Run complete");
    Ok(summary)
}

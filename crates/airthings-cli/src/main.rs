use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use airthings_cli::cli::Cli;
use airthings_cli::config::{Config, Settings};
use airthings_cli::runner::{ConsoleReporter, run_auto_discover, run_targeted};
use airthings_core::AirthingsClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so stdout carries only device output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let settings = Settings::resolve(&cli, &config);
    tracing::debug!(?settings, "Resolved settings");

    let client = AirthingsClient::new();
    let mut reporter = ConsoleReporter::new(settings.format);

    match settings.device.as_deref() {
        Some(address) => {
            run_targeted(
                &client,
                &client,
                address,
                settings.timeout,
                settings.units,
                &mut reporter,
            )
            .await?;
        }
        None => {
            run_auto_discover(
                &client,
                &client,
                settings.timeout,
                settings.units,
                &mut reporter,
            )
            .await?;
        }
    }

    Ok(())
}

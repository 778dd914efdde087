//! # Teleop Bridge
//!
//! Drive a humanoid robot with a gamepad.
//!
//! This binary runs the teleoperation front-end: it detects a connected
//! controller, starts the background polling loop, and prints the computed
//! command snapshot until interrupted.

use anyhow::Result;
use tokio::time::{interval, Duration};
use tracing::info;
use tracing_subscriber;

mod command;
mod config;
mod controller;
mod error;
mod teleop;

use config::Config;
use teleop::GamepadTeleop;

/// Default configuration file path.
const CONFIG_PATH: &str = "config/default.toml";

/// Status print rate in Hz.
const STATUS_RATE_HZ: u32 = 10;

/// Main entry point for the Teleop Bridge application
///
/// Initializes logging and configuration, resolves the connected controller,
/// and runs a status loop that prints the current command snapshot at 10Hz
/// until Ctrl+C.
///
/// # Errors
///
/// Returns error if the configuration file exists but fails to parse or
/// validate. A missing configuration file or missing controller is not an
/// error; defaults are used and resolution falls back to the XInput profile.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Teleop Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = if std::path::Path::new(CONFIG_PATH).exists() {
        Config::load(CONFIG_PATH)?
    } else {
        info!("No configuration file at {}, using defaults", CONFIG_PATH);
        Config::default()
    };

    // Detect the controller and start the polling loop
    let mut pad = GamepadTeleop::new(&config.controller);
    pad.start();

    let period_ms = 1000 / STATUS_RATE_HZ;
    let mut status_interval = interval(Duration::from_millis(period_ms as u64));

    info!("Printing command snapshots at {}Hz", STATUS_RATE_HZ);
    info!("Press Ctrl+C to exit");

    // Main status loop
    loop {
        tokio::select! {
            _ = status_interval.tick() => {
                let commands = pad.current_commands();
                info!(
                    "{:.2}, {:.2}, {:.2} (mode {})",
                    commands.velocity_x,
                    commands.velocity_y,
                    commands.velocity_yaw,
                    commands.mode_switch.code()
                );
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    pad.stop();

    Ok(())
}

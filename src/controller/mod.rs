//! # Controller Module
//!
//! Gamepad input handling for the teleoperation bridge.
//!
//! This module handles:
//! - Controller detection and profile selection by device name
//! - Normalizing raw axis samples with per-family calibration profiles
//! - Tracking the last-observed raw value of every control
//! - Reading raw events from evdev devices (or a lazily-bound fallback)

pub mod detect;
pub mod profile;
pub mod source;
pub mod state;

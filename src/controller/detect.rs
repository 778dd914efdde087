//! # Controller Detection Module
//!
//! Selects a controller profile (and optionally a device to bind) from an
//! ordered list of available input devices.
//!
//! Detection is a name-matching heuristic: device names are lower-cased and
//! scanned for known substrings. The caller supplies the device list, so the
//! same algorithm runs against real evdev enumeration and synthetic test
//! fixtures alike.
//!
//! ## Precedence
//!
//! Scanning the list in order, the first device that matches wins:
//!
//! 1. A DualSense/Sony device that is not one of the controller's auxiliary
//!    interfaces (motion sensor, touchpad) selects the DualSense profile.
//! 2. An Xbox/XInput device selects the XInput profile.
//! 3. No match: the XInput profile is used with no bound device, and reads
//!    fall back to the default source.
//!
//! Absence of a controller is not an error; the outcome is only logged.

use tracing::info;

use super::profile::ProfileKind;

/// A device visible to the resolver. Only the name participates in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Human-readable device name as reported by the input subsystem.
    pub name: String,
}

impl DeviceInfo {
    /// Creates a descriptor from any name-ish string.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outcome of profile resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Index into the supplied device list, or `None` for the default
    /// fallback (no device bound).
    pub device: Option<usize>,
    /// The profile family to normalize with.
    pub kind: ProfileKind,
}

/// Sony/DualSense name markers.
const DUALSENSE_MARKERS: &[&str] = &["dualsense", "sony"];

/// Auxiliary Sony interfaces that must not be bound as the gamepad.
const DUALSENSE_EXCLUDED: &[&str] = &["motion", "touchpad"];

/// Xbox/XInput name markers.
const XINPUT_MARKERS: &[&str] = &["xbox", "xinput"];

/// Selects a controller profile from an ordered device list.
///
/// See the module docs for the precedence rules. The selection is logged at
/// info level; an empty or unmatched list is not an error.
///
/// # Examples
///
/// ```
/// use teleop_bridge::controller::detect::{select_profile, DeviceInfo};
/// use teleop_bridge::controller::profile::ProfileKind;
///
/// let devices = [DeviceInfo::new("Xbox Wireless Controller")];
/// let selection = select_profile(&devices);
/// assert_eq!(selection.device, Some(0));
/// assert_eq!(selection.kind, ProfileKind::XInput);
/// ```
#[must_use]
pub fn select_profile(devices: &[DeviceInfo]) -> Selection {
    for (index, device) in devices.iter().enumerate() {
        let name = device.name.to_lowercase();

        if DUALSENSE_MARKERS.iter().any(|m| name.contains(m))
            && !DUALSENSE_EXCLUDED.iter().any(|m| name.contains(m))
        {
            info!("Detected gamepad: {}", device.name);
            return Selection {
                device: Some(index),
                kind: ProfileKind::DualSense,
            };
        }

        if XINPUT_MARKERS.iter().any(|m| name.contains(m)) {
            info!("Detected gamepad: {}", device.name);
            return Selection {
                device: Some(index),
                kind: ProfileKind::XInput,
            };
        }
    }

    info!("No specific controller detected, using default gamepad with XInput profile");
    Selection {
        device: None,
        kind: ProfileKind::XInput,
    }
}

//! # Event Source Module
//!
//! The seam between the polling loop and the hardware: a blocking,
//! batch-oriented reader trait plus its evdev-backed implementations.
//!
//! Two real sources exist. [`EvdevSource`] wraps a device the resolver bound
//! at startup. [`DefaultSource`] covers the fallback case where no known
//! controller was detected: it lazily binds the first gamepad-capable device
//! it can find at read time, and unbinds again on error so a pad plugged in
//! later is picked up on a subsequent cycle.
//!
//! Every failure surfaces as a `Controller` error; the polling loop treats
//! all of them as transient.

use evdev::{AbsoluteAxisType, Device, InputEvent, InputEventKind, Key};
use tracing::{debug, info};

use super::detect::{select_profile, DeviceInfo};
use super::profile::ProfileKind;
use super::state::{Control, RawEvent};
use crate::error::{Result, TeleopBridgeError};

/// Blocking source of raw input events.
///
/// One call returns one batch; the call may block until the device has
/// something to report. Implementations must be `Send` so the polling loop
/// can own them on its worker thread.
pub trait EventSource: Send {
    /// Reads the next batch of events, blocking until at least one is
    /// available (or the source fails).
    fn read_events(&mut self) -> Result<Vec<RawEvent>>;
}

/// Event source bound to a specific evdev device.
pub struct EvdevSource {
    device: Device,
    kind: ProfileKind,
}

impl EvdevSource {
    /// Wraps an opened device, translating its events with the axis table
    /// for the given profile family.
    #[must_use]
    pub fn new(device: Device, kind: ProfileKind) -> Self {
        Self { device, kind }
    }
}

impl EventSource for EvdevSource {
    fn read_events(&mut self) -> Result<Vec<RawEvent>> {
        let kind = self.kind;
        let events = self
            .device
            .fetch_events()
            .map_err(|e| TeleopBridgeError::Controller(format!("failed to fetch events: {e}")))?;

        Ok(events
            .filter_map(|event| translate_event(kind, &event))
            .collect())
    }
}

/// Fallback event source used when the resolver bound no device.
///
/// Reads come from whatever gamepad-capable device is currently present;
/// the binding is re-established from scratch after any failure.
#[derive(Default)]
pub struct DefaultSource {
    inner: Option<EvdevSource>,
}

impl DefaultSource {
    /// Creates an unbound default source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSource for DefaultSource {
    fn read_events(&mut self) -> Result<Vec<RawEvent>> {
        let source = match self.inner.as_mut() {
            Some(source) => source,
            None => self.inner.insert(find_default_gamepad()?),
        };

        match source.read_events() {
            Ok(events) => Ok(events),
            Err(e) => {
                // Drop the binding so the next cycle rescans.
                self.inner = None;
                Err(e)
            }
        }
    }
}

/// Resolves real hardware: enumerates evdev devices, selects a profile by
/// name, and opens the matched device.
///
/// Returns `(None, XInput)` when nothing matched; the caller falls back to a
/// [`DefaultSource`]. Absence of a controller is never an error.
#[must_use]
pub fn bind() -> (Option<EvdevSource>, ProfileKind) {
    let mut devices: Vec<(std::path::PathBuf, Device)> = evdev::enumerate().collect();

    for (path, device) in &devices {
        debug!(
            "Found input device: {} ({})",
            path.display(),
            device.name().unwrap_or("<unnamed>")
        );
    }

    let names: Vec<DeviceInfo> = devices
        .iter()
        .map(|(_, device)| DeviceInfo::new(device.name().unwrap_or_default()))
        .collect();

    let selection = select_profile(&names);

    match selection.device {
        Some(index) => {
            let (path, device) = devices.swap_remove(index);
            info!(
                "Bound controller device {} ({})",
                path.display(),
                device.name().unwrap_or("<unnamed>")
            );
            (Some(EvdevSource::new(device, selection.kind)), selection.kind)
        }
        None => (None, selection.kind),
    }
}

/// Finds the first device that advertises gamepad buttons.
fn find_default_gamepad() -> Result<EvdevSource> {
    for (path, device) in evdev::enumerate() {
        let has_gamepad_keys = device
            .supported_keys()
            .is_some_and(|keys| keys.contains(Key::BTN_SOUTH));

        if has_gamepad_keys {
            info!(
                "Default source bound to {} ({})",
                path.display(),
                device.name().unwrap_or("<unnamed>")
            );
            return Ok(EvdevSource::new(device, ProfileKind::XInput));
        }
    }

    Err(TeleopBridgeError::Controller(
        "no gamepad device available".to_string(),
    ))
}

/// Translates one evdev event into a [`RawEvent`], or drops it.
fn translate_event(kind: ProfileKind, event: &InputEvent) -> Option<RawEvent> {
    let control = match event.kind() {
        InputEventKind::AbsAxis(axis) => translate_axis(kind, axis)?,
        InputEventKind::Key(key) => translate_key(key)?,
        // Sync and miscellaneous events carry no control state.
        _ => return None,
    };

    Some(RawEvent::new(control, event.value()))
}

/// Axis translation differs per profile family.
///
/// XInput pads report the right stick on ABS_RX/ABS_RY and triggers on
/// ABS_Z/ABS_RZ; the DualSense swaps those groups (right stick on
/// ABS_Z/ABS_RZ, analog triggers on ABS_RX/ABS_RY).
fn translate_axis(kind: ProfileKind, axis: AbsoluteAxisType) -> Option<Control> {
    let control = match (kind, axis) {
        (_, AbsoluteAxisType::ABS_X) => Control::LeftStickX,
        (_, AbsoluteAxisType::ABS_Y) => Control::LeftStickY,
        (_, AbsoluteAxisType::ABS_HAT0X) => Control::DpadX,
        (_, AbsoluteAxisType::ABS_HAT0Y) => Control::DpadY,

        (ProfileKind::XInput, AbsoluteAxisType::ABS_RX) => Control::RightStickX,
        (ProfileKind::XInput, AbsoluteAxisType::ABS_RY) => Control::RightStickY,
        (ProfileKind::XInput, AbsoluteAxisType::ABS_Z) => Control::LeftTrigger,
        (ProfileKind::XInput, AbsoluteAxisType::ABS_RZ) => Control::RightTrigger,

        (ProfileKind::DualSense, AbsoluteAxisType::ABS_Z) => Control::RightStickX,
        (ProfileKind::DualSense, AbsoluteAxisType::ABS_RZ) => Control::RightStickY,
        (ProfileKind::DualSense, AbsoluteAxisType::ABS_RX) => Control::LeftTrigger,
        (ProfileKind::DualSense, AbsoluteAxisType::ABS_RY) => Control::RightTrigger,

        // Gyro, accelerometer, and friends.
        _ => return None,
    };

    Some(control)
}

/// Button translation is shared across profile families.
fn translate_key(key: Key) -> Option<Control> {
    let control = match key {
        Key::BTN_SOUTH => Control::ButtonA,
        Key::BTN_EAST => Control::ButtonB,
        Key::BTN_NORTH => Control::ButtonX,
        Key::BTN_WEST => Control::ButtonY,
        Key::BTN_TL => Control::LeftBumper,
        Key::BTN_TR => Control::RightBumper,
        Key::BTN_THUMBL => Control::LeftThumb,
        Key::BTN_THUMBR => Control::RightThumb,
        Key::BTN_SELECT => Control::Back,
        Key::BTN_START => Control::Start,
        _ => return None,
    };

    Some(control)
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Event source that replays scripted batches, then idles.
    ///
    /// After the script runs out it sleeps briefly and returns empty
    /// batches, keeping the polling loop cycling so cancellation is
    /// observed promptly.
    pub struct ScriptedSource {
        batches: VecDeque<Vec<RawEvent>>,
        idle_delay: Duration,
    }

    impl ScriptedSource {
        pub fn new(batches: Vec<Vec<RawEvent>>) -> Self {
            Self {
                batches: batches.into(),
                idle_delay: Duration::from_millis(5),
            }
        }
    }

    impl EventSource for ScriptedSource {
        fn read_events(&mut self) -> Result<Vec<RawEvent>> {
            match self.batches.pop_front() {
                Some(batch) => Ok(batch),
                None => {
                    std::thread::sleep(self.idle_delay);
                    Ok(Vec::new())
                }
            }
        }
    }

    /// Event source that always fails, counting the attempts.
    pub struct FailingSource {
        pub attempts: Arc<Mutex<usize>>,
    }

    impl FailingSource {
        pub fn new() -> Self {
            Self {
                attempts: Arc::new(Mutex::new(0)),
            }
        }

        pub fn attempt_count(&self) -> Arc<Mutex<usize>> {
            Arc::clone(&self.attempts)
        }
    }

    impl EventSource for FailingSource {
        fn read_events(&mut self) -> Result<Vec<RawEvent>> {
            *self.attempts.lock().unwrap() += 1;
            std::thread::sleep(Duration::from_millis(1));
            Err(TeleopBridgeError::Controller("mock read error".to_string()))
        }
    }
}

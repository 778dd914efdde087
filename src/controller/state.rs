//! # Raw Control State Module
//!
//! Tracks the last-observed raw value for every control on the pad.
//!
//! Raw values are stored exactly as the device reported them; normalization
//! and scaling happen later in the command computer. A control that has never
//! reported holds no value at all, which downstream code treats as "no
//! signal": axes normalize to 0.0 and buttons read as released.
//!
//! The tracker is written only by the polling loop and read only by the
//! command computer; it needs no internal synchronization.

/// Identifier for one control on the pad.
///
/// This is the closed set of inputs the bridge understands. Events carrying
/// any other hardware code are dropped at the event-source boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Control {
    /// Left stick, horizontal.
    LeftStickX,
    /// Left stick, vertical.
    LeftStickY,
    /// Right stick, horizontal.
    RightStickX,
    /// Right stick, vertical.
    RightStickY,
    /// Left analog trigger.
    LeftTrigger,
    /// Right analog trigger.
    RightTrigger,
    /// D-pad, horizontal (-1/0/1).
    DpadX,
    /// D-pad, vertical (-1/0/1).
    DpadY,
    /// Face button A (Cross on Sony pads).
    ButtonA,
    /// Face button B (Circle).
    ButtonB,
    /// Face button X (Triangle).
    ButtonX,
    /// Face button Y (Square).
    ButtonY,
    /// Left bumper.
    LeftBumper,
    /// Right bumper.
    RightBumper,
    /// Left stick press.
    LeftThumb,
    /// Right stick press.
    RightThumb,
    /// Back/Select/Share button.
    Back,
    /// Start/Options button.
    Start,
}

impl Control {
    /// Number of distinct controls.
    pub const COUNT: usize = 18;
}

/// One raw input event from an event source: a control and its new value.
///
/// Axis values are raw device samples; button values are 0 (released) or
/// nonzero (pressed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// The control that changed.
    pub code: Control,
    /// The raw value the device reported.
    pub value: i32,
}

impl RawEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(code: Control, value: i32) -> Self {
        Self { code, value }
    }
}

/// Last-observed raw value per control.
///
/// # Examples
///
/// ```
/// use teleop_bridge::controller::state::{Control, ControlState, RawEvent};
///
/// let mut state = ControlState::new();
/// assert_eq!(state.get(Control::LeftStickY), None);
///
/// state.apply(&RawEvent::new(Control::LeftStickY, -32000));
/// assert_eq!(state.get(Control::LeftStickY), Some(-32000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    values: [Option<i32>; Control::COUNT],
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            values: [None; Control::COUNT],
        }
    }
}

impl ControlState {
    /// Creates a tracker with no controls observed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last raw value seen for a control, or `None` if it has
    /// never reported.
    #[must_use]
    pub fn get(&self, control: Control) -> Option<i32> {
        self.values[control as usize]
    }

    /// Records an event's value as the control's current raw value.
    pub fn apply(&mut self, event: &RawEvent) {
        self.values[event.code as usize] = Some(event.value);
    }

    /// Whether a button-like control currently reads as pressed.
    ///
    /// Never-reported and zero-valued controls are both unpressed.
    #[must_use]
    pub fn is_pressed(&self, control: Control) -> bool {
        self.get(control).is_some_and(|value| value != 0)
    }

    /// Forgets every observed value, returning to the no-signal state.
    pub fn reset(&mut self) {
        self.values = [None; Control::COUNT];
    }
}

//! # Command Computation Module
//!
//! Turns the tracked raw control state into the robot-facing command
//! snapshot: a planar velocity request plus a discrete mode switch.
//!
//! ## Axis Assignments
//!
//! The wiring is fixed:
//!
//! | Axis | Command | Function |
//! |------|---------|----------|
//! | Left Stick Y | `velocity_x` | Forward/backward |
//! | Right Stick X | `velocity_y` | Lateral (strafe) |
//! | Left Stick X | `velocity_yaw` | Turn rate |
//!
//! Each axis is normalized through the active controller profile, zeroed
//! inside the configured dead zone, then scaled by the stick sensitivity.
//!
//! ## Mode Switch
//!
//! | Code | Mode | Trigger |
//! |------|------|---------|
//! | 0 | no change | nothing held |
//! | 1 | idle | X, or either stick press |
//! | 2 | init | A + left bumper |
//! | 3 | activate | A + right bumper |
//!
//! The trigger conditions are evaluated without early exit, in the order
//! init, activate, idle; when several hold at once the later assignment
//! wins. Activate therefore beats init when A is held with both bumpers,
//! and idle beats both. This override order is load-bearing and must not be
//! reordered.
//!
//! ## Usage
//!
//! ```
//! use teleop_bridge::command::CommandComputer;
//! use teleop_bridge::config::ControllerConfig;
//! use teleop_bridge::controller::profile::ProfileKind;
//! use teleop_bridge::controller::state::ControlState;
//!
//! let computer = CommandComputer::new(ProfileKind::XInput, &ControllerConfig::default());
//! let commands = computer.compute(&ControlState::new());
//! assert_eq!(commands.velocity_x, 0.0);
//! ```

use crate::config::ControllerConfig;
use crate::controller::profile::{ControllerProfile, ProfileKind};
use crate::controller::state::{Control, ControlState};

/// Requested operating-mode change, carried alongside the velocity command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSwitch {
    /// No mode change requested; the robot continues as-is.
    #[default]
    NoChange,
    /// Request idle mode (X or a stick press). Always wins over the others.
    Idle,
    /// Request init mode (A + left bumper).
    Init,
    /// Request activate/RL-control mode (A + right bumper).
    Activate,
}

impl ModeSwitch {
    /// The wire code for this mode, for consumers that speak integers.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            ModeSwitch::NoChange => 0,
            ModeSwitch::Idle => 1,
            ModeSwitch::Init => 2,
            ModeSwitch::Activate => 3,
        }
    }
}

/// One complete, immutable command for the robot control loop.
///
/// Velocities are in `[-stick_sensitivity, stick_sensitivity]` for in-range
/// hardware input. A fresh snapshot replaces the previous one wholesale each
/// polling cycle; `Default` is the all-zero snapshot published before the
/// first cycle completes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommandSnapshot {
    /// Forward/backward velocity request.
    pub velocity_x: f32,
    /// Lateral velocity request.
    pub velocity_y: f32,
    /// Yaw-rate request.
    pub velocity_yaw: f32,
    /// Requested mode change.
    pub mode_switch: ModeSwitch,
}

/// Computes command snapshots from raw control state.
///
/// Stateless between calls: the output depends only on the control state
/// passed in, with no smoothing or hysteresis.
///
/// # Examples
///
/// ```
/// use teleop_bridge::command::{CommandComputer, ModeSwitch};
/// use teleop_bridge::config::ControllerConfig;
/// use teleop_bridge::controller::profile::ProfileKind;
/// use teleop_bridge::controller::state::{Control, ControlState, RawEvent};
///
/// let computer = CommandComputer::new(ProfileKind::DualSense, &ControllerConfig::default());
///
/// let mut state = ControlState::new();
/// state.apply(&RawEvent::new(Control::ButtonX, 1));
///
/// assert_eq!(computer.compute(&state).mode_switch, ModeSwitch::Idle);
/// ```
#[derive(Debug, Clone)]
pub struct CommandComputer {
    profile: ControllerProfile,
    stick_sensitivity: f32,
    dead_zone: f32,
}

impl CommandComputer {
    /// Creates a computer for the given profile family and configuration.
    #[must_use]
    pub fn new(kind: ProfileKind, config: &ControllerConfig) -> Self {
        Self {
            profile: kind.profile(),
            stick_sensitivity: config.stick_sensitivity,
            dead_zone: config.dead_zone,
        }
    }

    /// Returns the display name of the active profile.
    #[must_use]
    pub fn profile_name(&self) -> &'static str {
        self.profile.name
    }

    /// Computes a fresh command snapshot from the current control state.
    #[must_use]
    pub fn compute(&self, state: &ControlState) -> CommandSnapshot {
        CommandSnapshot {
            velocity_x: self.shaped_axis(state.get(Control::LeftStickY)),
            velocity_y: self.shaped_axis(state.get(Control::RightStickX)),
            velocity_yaw: self.shaped_axis(state.get(Control::LeftStickX)),
            mode_switch: Self::mode_switch(state),
        }
    }

    /// Normalizes a raw axis sample, applies the dead zone, and scales by
    /// the stick sensitivity.
    fn shaped_axis(&self, raw: Option<i32>) -> f32 {
        let mut value = self.profile.normalize(raw);

        if value.abs() < self.dead_zone {
            value = 0.0;
        }

        value * self.stick_sensitivity
    }

    /// Derives the mode switch from the held buttons.
    ///
    /// Every condition is checked; a later assignment overwrites an earlier
    /// one. Keep the order: init, activate, idle.
    fn mode_switch(state: &ControlState) -> ModeSwitch {
        let mut mode = ModeSwitch::NoChange;

        if state.is_pressed(Control::ButtonA) && state.is_pressed(Control::LeftBumper) {
            mode = ModeSwitch::Init;
        }

        if state.is_pressed(Control::ButtonA) && state.is_pressed(Control::RightBumper) {
            mode = ModeSwitch::Activate;
        }

        if state.is_pressed(Control::ButtonX)
            || state.is_pressed(Control::LeftThumb)
            || state.is_pressed(Control::RightThumb)
        {
            mode = ModeSwitch::Idle;
        }

        mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::RawEvent;

    /// DualSense profile makes raw values easy to reason about: center 128,
    /// full deflection at 0/255.
    fn computer(sensitivity: f32, dead_zone: f32) -> CommandComputer {
        let config = ControllerConfig {
            stick_sensitivity: sensitivity,
            dead_zone,
            debug: false,
        };
        CommandComputer::new(ProfileKind::DualSense, &config)
    }

    fn state_with(events: &[(Control, i32)]) -> ControlState {
        let mut state = ControlState::new();
        for &(code, value) in events {
            state.apply(&RawEvent::new(code, value));
        }
        state
    }

    // ==================== Snapshot Tests ====================

    #[test]
    fn test_default_snapshot_is_zero() {
        let snapshot = CommandSnapshot::default();
        assert_eq!(snapshot.velocity_x, 0.0);
        assert_eq!(snapshot.velocity_y, 0.0);
        assert_eq!(snapshot.velocity_yaw, 0.0);
        assert_eq!(snapshot.mode_switch, ModeSwitch::NoChange);
    }

    #[test]
    fn test_empty_state_computes_zero_snapshot() {
        let snapshot = computer(1.0, 0.01).compute(&ControlState::new());
        assert_eq!(snapshot, CommandSnapshot::default());
    }

    #[test]
    fn test_mode_codes() {
        assert_eq!(ModeSwitch::NoChange.code(), 0);
        assert_eq!(ModeSwitch::Idle.code(), 1);
        assert_eq!(ModeSwitch::Init.code(), 2);
        assert_eq!(ModeSwitch::Activate.code(), 3);
    }

    // ==================== Axis Wiring Tests ====================

    #[test]
    fn test_left_stick_y_drives_velocity_x() {
        // Stick fully forward (raw 0) is positive forward velocity.
        let snapshot = computer(1.0, 0.01).compute(&state_with(&[(Control::LeftStickY, 0)]));
        assert_eq!(snapshot.velocity_x, 1.0);
        assert_eq!(snapshot.velocity_y, 0.0);
        assert_eq!(snapshot.velocity_yaw, 0.0);
    }

    #[test]
    fn test_right_stick_x_drives_velocity_y() {
        let snapshot = computer(1.0, 0.01).compute(&state_with(&[(Control::RightStickX, 0)]));
        assert_eq!(snapshot.velocity_y, 1.0);
        assert_eq!(snapshot.velocity_x, 0.0);
    }

    #[test]
    fn test_left_stick_x_drives_velocity_yaw() {
        let snapshot = computer(1.0, 0.01).compute(&state_with(&[(Control::LeftStickX, 0)]));
        assert_eq!(snapshot.velocity_yaw, 1.0);
        assert_eq!(snapshot.velocity_x, 0.0);
    }

    #[test]
    fn test_right_stick_y_does_not_drive_velocities() {
        let snapshot = computer(1.0, 0.01).compute(&state_with(&[(Control::RightStickY, 0)]));
        assert_eq!(snapshot, CommandSnapshot::default());
    }

    // ==================== Dead Zone and Sensitivity Tests ====================

    #[test]
    fn test_dead_zone_zeroes_small_deflections() {
        // raw 129 normalizes to ~0.0078, inside the default 0.01 dead zone.
        let snapshot = computer(1.0, 0.01).compute(&state_with(&[(Control::LeftStickY, 129)]));
        assert_eq!(snapshot.velocity_x, 0.0);
    }

    #[test]
    fn test_values_at_or_above_dead_zone_pass_through() {
        // raw 130 normalizes to -0.015625 (inverted), outside the dead zone.
        let snapshot = computer(1.0, 0.01).compute(&state_with(&[(Control::LeftStickY, 130)]));
        assert_eq!(snapshot.velocity_x, -0.015625);
    }

    #[test]
    fn test_dead_zone_boundary_is_exclusive() {
        // With dead_zone exactly equal to |normalized|, the value survives.
        let snapshot = computer(1.0, 0.5).compute(&state_with(&[(Control::LeftStickY, 64)]));
        assert_eq!(snapshot.velocity_x, 0.5);
    }

    #[test]
    fn test_sensitivity_scales_after_dead_zone() {
        let snapshot = computer(0.5, 0.01).compute(&state_with(&[(Control::LeftStickY, 0)]));
        assert_eq!(snapshot.velocity_x, 0.5);
    }

    #[test]
    fn test_sensitivity_does_not_rescue_dead_zone_values() {
        // A large sensitivity multiplies the post-dead-zone value, which is 0.
        let snapshot = computer(100.0, 0.01).compute(&state_with(&[(Control::LeftStickY, 129)]));
        assert_eq!(snapshot.velocity_x, 0.0);
    }

    #[test]
    fn test_missing_axis_reads_as_zero() {
        let snapshot = computer(2.0, 0.01).compute(&state_with(&[(Control::ButtonA, 1)]));
        assert_eq!(snapshot.velocity_x, 0.0);
        assert_eq!(snapshot.velocity_y, 0.0);
        assert_eq!(snapshot.velocity_yaw, 0.0);
    }

    // ==================== Mode Precedence Tests ====================

    #[test]
    fn test_no_buttons_means_no_change() {
        let snapshot = computer(1.0, 0.01).compute(&ControlState::new());
        assert_eq!(snapshot.mode_switch, ModeSwitch::NoChange);
    }

    #[test]
    fn test_a_with_left_bumper_is_init() {
        let state = state_with(&[(Control::ButtonA, 1), (Control::LeftBumper, 1)]);
        assert_eq!(computer(1.0, 0.01).compute(&state).mode_switch, ModeSwitch::Init);
    }

    #[test]
    fn test_a_with_right_bumper_is_activate() {
        let state = state_with(&[(Control::ButtonA, 1), (Control::RightBumper, 1)]);
        assert_eq!(
            computer(1.0, 0.01).compute(&state).mode_switch,
            ModeSwitch::Activate
        );
    }

    #[test]
    fn test_activate_overrides_init_with_both_bumpers() {
        let state = state_with(&[
            (Control::ButtonA, 1),
            (Control::LeftBumper, 1),
            (Control::RightBumper, 1),
        ]);
        assert_eq!(
            computer(1.0, 0.01).compute(&state).mode_switch,
            ModeSwitch::Activate
        );
    }

    #[test]
    fn test_idle_overrides_everything() {
        let state = state_with(&[
            (Control::ButtonA, 1),
            (Control::LeftBumper, 1),
            (Control::RightBumper, 1),
            (Control::ButtonX, 1),
        ]);
        assert_eq!(computer(1.0, 0.01).compute(&state).mode_switch, ModeSwitch::Idle);
    }

    #[test]
    fn test_stick_presses_request_idle() {
        for thumb in [Control::LeftThumb, Control::RightThumb] {
            let state = state_with(&[(thumb, 1)]);
            assert_eq!(
                computer(1.0, 0.01).compute(&state).mode_switch,
                ModeSwitch::Idle,
                "{thumb:?} should request idle"
            );
        }
    }

    #[test]
    fn test_a_alone_is_no_change() {
        let state = state_with(&[(Control::ButtonA, 1)]);
        assert_eq!(
            computer(1.0, 0.01).compute(&state).mode_switch,
            ModeSwitch::NoChange
        );
    }

    #[test]
    fn test_bumper_alone_is_no_change() {
        let state = state_with(&[(Control::RightBumper, 1)]);
        assert_eq!(
            computer(1.0, 0.01).compute(&state).mode_switch,
            ModeSwitch::NoChange
        );
    }

    #[test]
    fn test_released_buttons_do_not_hold_modes() {
        // A press followed by a release leaves an observed zero value.
        let state = state_with(&[
            (Control::ButtonA, 1),
            (Control::RightBumper, 1),
            (Control::ButtonA, 0),
        ]);
        assert_eq!(
            computer(1.0, 0.01).compute(&state).mode_switch,
            ModeSwitch::NoChange
        );
    }

    // ==================== Combined Tests ====================

    #[test]
    fn test_velocities_and_mode_compute_together() {
        let state = state_with(&[
            (Control::LeftStickY, 0),
            (Control::LeftStickX, 255),
            (Control::ButtonA, 1),
            (Control::LeftBumper, 1),
        ]);
        let snapshot = computer(1.0, 0.01).compute(&state);

        assert_eq!(snapshot.velocity_x, 1.0);
        assert!(snapshot.velocity_yaw < -0.9);
        assert_eq!(snapshot.mode_switch, ModeSwitch::Init);
    }
}

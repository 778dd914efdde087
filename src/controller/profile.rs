//! # Controller Profile Module
//!
//! Normalizes raw axis samples to the range -1.0 to 1.0 using per-device
//! calibration constants.
//!
//! ## Profiles
//!
//! Different controller families report axis samples in different raw ranges:
//!
//! | Profile | Center | Range | Raw span |
//! |---------|--------|-------|----------|
//! | XInput/Xbox | 0 | 32768 | -32768..32767 |
//! | Sony DualSense | 128 | 128 | 0..255 |
//!
//! Both built-in profiles invert the normalized value, matching the standard
//! stick convention (pushing the left stick forward means positive forward
//! velocity).
//!
//! ## Normalization
//!
//! The formula is linear: `(raw - center_value) / max_range`, negated when
//! `invert` is set. A missing sample (`None`) normalizes to 0.0. No output
//! clamping is applied; calibrated constants keep results within -1.0 to 1.0
//! for in-range hardware samples, and consumers must not assume a hard clamp
//! for out-of-calibration input.
//!
//! ## Usage
//!
//! ```
//! use teleop_bridge::controller::profile::ProfileKind;
//!
//! let profile = ProfileKind::DualSense.profile();
//! assert_eq!(profile.normalize(Some(128)), 0.0);
//! assert_eq!(profile.normalize(None), 0.0);
//! assert!(profile.normalize(Some(0)) > 0.0); // inverted
//! ```

use crate::error::{Result, TeleopBridgeError};

/// The closed set of supported controller families.
///
/// Profile selection happens once, at device resolution time; everything
/// downstream works with the [`ControllerProfile`] constants this resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// XInput/Xbox-style controllers. Also the fallback when no known
    /// controller is detected.
    XInput,
    /// Sony DualSense (PS5) controllers.
    DualSense,
}

impl ProfileKind {
    /// Returns the calibration profile for this controller family.
    #[must_use]
    pub fn profile(self) -> ControllerProfile {
        match self {
            ProfileKind::XInput => ControllerProfile {
                name: "XInput/Xbox Controller",
                center_value: 0.0,
                max_range: 32768.0,
                invert: true,
            },
            ProfileKind::DualSense => ControllerProfile {
                name: "Sony DualSense (PS5)",
                center_value: 128.0,
                max_range: 128.0,
                invert: true,
            },
        }
    }
}

/// Calibration constants for normalizing one controller family's axis samples.
///
/// # Examples
///
/// ```
/// use teleop_bridge::controller::profile::ProfileKind;
///
/// let profile = ProfileKind::XInput.profile();
/// assert_eq!(profile.normalize(Some(0)), 0.0);       // center
/// assert_eq!(profile.normalize(Some(-32768)), 1.0);  // full deflection, inverted
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerProfile {
    /// Display name, used only for logging.
    pub name: &'static str,
    /// Raw axis value representing zero deflection.
    pub center_value: f32,
    /// Maximum raw deviation from center. Always positive.
    pub max_range: f32,
    /// Whether the sign is flipped after normalization.
    pub invert: bool,
}

impl ControllerProfile {
    /// Creates a profile with caller-supplied calibration constants.
    ///
    /// The built-in profiles come from [`ProfileKind::profile`]; this
    /// constructor exists for hardware with non-standard ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProfile` if `max_range` is not a positive finite
    /// number. A zero range would divide by zero in [`normalize`].
    ///
    /// [`normalize`]: ControllerProfile::normalize
    pub fn new(
        name: &'static str,
        center_value: f32,
        max_range: f32,
        invert: bool,
    ) -> Result<Self> {
        if !max_range.is_finite() || max_range <= 0.0 {
            return Err(TeleopBridgeError::InvalidProfile(format!(
                "max_range must be a positive finite number, got {max_range}"
            )));
        }

        Ok(Self {
            name,
            center_value,
            max_range,
            invert,
        })
    }

    /// Normalizes a raw axis sample to the range -1.0 to 1.0.
    ///
    /// A missing sample (`None`, meaning the axis has never reported) maps to
    /// 0.0. The result is not clamped; see the module docs.
    ///
    /// # Examples
    ///
    /// ```
    /// use teleop_bridge::controller::profile::ProfileKind;
    ///
    /// let profile = ProfileKind::DualSense.profile();
    /// assert_eq!(profile.normalize(None), 0.0);
    /// assert_eq!(profile.normalize(Some(128)), 0.0);
    /// assert_eq!(profile.normalize(Some(255)), -0.9921875);
    /// ```
    #[must_use]
    pub fn normalize(&self, raw: Option<i32>) -> f32 {
        let Some(raw) = raw else {
            return 0.0;
        };

        let normalized = (raw as f32 - self.center_value) / self.max_range;
        if self.invert {
            -normalized
        } else {
            normalized
        }
    }
}

//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,
}

/// Controller configuration
///
/// All knobs are immutable after construction; the polling loop captures them
/// when it starts.
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Scale factor applied to normalized stick values after the dead zone.
    #[serde(default = "default_stick_sensitivity")]
    pub stick_sensitivity: f32,

    /// Normalized deflection below which an axis reads as zero.
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,

    /// Log transient controller read errors at debug level.
    #[serde(default = "default_debug")]
    pub debug: bool,
}

// Default value functions
fn default_stick_sensitivity() -> f32 { 1.0 }
fn default_dead_zone() -> f32 { 0.01 }
fn default_debug() -> bool { false }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            stick_sensitivity: default_stick_sensitivity(),
            dead_zone: default_dead_zone(),
            debug: default_debug(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use teleop_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        let controller = &self.controller;

        if !controller.stick_sensitivity.is_finite() || controller.stick_sensitivity <= 0.0 {
            return Err(crate::error::TeleopBridgeError::Config(
                toml::de::Error::custom("stick_sensitivity must be a positive finite number")
            ));
        }

        if !controller.dead_zone.is_finite()
            || controller.dead_zone < 0.0
            || controller.dead_zone >= 1.0
        {
            return Err(crate::error::TeleopBridgeError::Config(
                toml::de::Error::custom("dead_zone must be in the range [0.0, 1.0)")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.controller.stick_sensitivity, 1.0);
        assert_eq!(config.controller.dead_zone, 0.01);
        assert!(!config.controller.debug);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.controller.stick_sensitivity, 1.0);
        assert_eq!(config.controller.dead_zone, 0.01);
        assert!(!config.controller.debug);
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let config = Config::from_toml_str(
            r#"
            [controller]
            dead_zone = 0.05
            "#,
        )
        .unwrap();
        assert_eq!(config.controller.dead_zone, 0.05);
        assert_eq!(config.controller.stick_sensitivity, 1.0);
        assert!(!config.controller.debug);
    }

    #[test]
    fn test_full_section_parses() {
        let config = Config::from_toml_str(
            r#"
            [controller]
            stick_sensitivity = 0.5
            dead_zone = 0.1
            debug = true
            "#,
        )
        .unwrap();
        assert_eq!(config.controller.stick_sensitivity, 0.5);
        assert_eq!(config.controller.dead_zone, 0.1);
        assert!(config.controller.debug);
    }

    #[test]
    fn test_rejects_zero_sensitivity() {
        let result = Config::from_toml_str(
            r#"
            [controller]
            stick_sensitivity = 0.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_negative_sensitivity() {
        let result = Config::from_toml_str(
            r#"
            [controller]
            stick_sensitivity = -1.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_dead_zone_of_one_or_more() {
        let result = Config::from_toml_str(
            r#"
            [controller]
            dead_zone = 1.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_negative_dead_zone() {
        let result = Config::from_toml_str(
            r#"
            [controller]
            dead_zone = -0.01
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[controller]\nstick_sensitivity = 2.0").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.controller.stick_sensitivity, 2.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Config::load("/nonexistent/teleop-bridge-config.toml");
        assert!(matches!(
            result.unwrap_err(),
            crate::error::TeleopBridgeError::Io(_)
        ));
    }
}

//! # Error Types
//!
//! Custom error types for Teleop Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Teleop Bridge
#[derive(Debug, Error)]
pub enum TeleopBridgeError {
    /// Controller read/decode errors (device missing, disconnected, ...)
    #[error("controller error: {0}")]
    Controller(String),

    /// Invalid controller profile constants
    #[error("invalid controller profile: {0}")]
    InvalidProfile(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Teleop Bridge
pub type Result<T> = std::result::Result<T, TeleopBridgeError>;

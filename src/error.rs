//! # Error Types
//!
//! Custom error types for Arm Teleop using `thiserror`.

use thiserror::Error;

/// Main error type for Arm Teleop
#[derive(Debug, Error)]
pub enum TeleopError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Gamepad device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No usable gamepad under /dev/input
    #[error("No gamepad found under /dev/input")]
    ControllerNotFound,

    /// Input sample shorter than the fixed device report
    #[error("Malformed input sample: {axes} axes, {buttons} buttons (need at least 8 and 11)")]
    MalformedSample {
        /// Number of axes received
        axes: usize,
        /// Number of buttons received
        buttons: usize,
    },

    /// JSON encode/decode errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TeleopError {
    /// Returns true when the command output's reader has gone away.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, TeleopError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

/// Result type alias for Arm Teleop
pub type Result<T> = std::result::Result<T, TeleopError>;

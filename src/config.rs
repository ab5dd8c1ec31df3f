//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; anything left out takes the value
//! of its `default_*` function.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub teleop: TeleopConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input source configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// `"evdev"` reads a gamepad, `"stdin"` reads JSON lines.
    #[serde(default = "default_source")]
    pub source: String,

    /// Empty means auto-detect.
    #[serde(default)]
    pub device_path: String,

    #[serde(default = "default_deadzone")]
    pub deadzone: f32,

    #[serde(default = "default_sample_queue_depth")]
    pub sample_queue_depth: usize,
}

/// Mapping and smoothing parameters
#[derive(Debug, Deserialize, Clone)]
pub struct TeleopConfig {
    /// m/s per unit of left stick deflection
    #[serde(default = "default_linear_scale")]
    pub linear_scale: f64,

    /// m/s per unit of trigger difference
    #[serde(default = "default_vertical_scale")]
    pub vertical_scale: f64,

    /// rad/s per unit of right stick / bumper input
    #[serde(default = "default_angular_scale")]
    pub angular_scale: f64,

    #[serde(default = "default_smoothing_alpha")]
    pub smoothing_alpha: f64,

    #[serde(default = "default_boost_factor")]
    pub boost_factor: f64,

    #[serde(default = "default_boost_delay_ms")]
    pub boost_delay_ms: u64,

    #[serde(default = "default_trigger_floor")]
    pub trigger_floor: f64,

    #[serde(default = "default_advisory_interval_s")]
    pub advisory_interval_s: u64,
}

/// Command output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_frame_id")]
    pub frame_id: String,

    #[serde(default = "default_twist_topic")]
    pub twist_topic: String,

    #[serde(default = "default_gripper_topic")]
    pub gripper_topic: String,

    /// Empty means stdout.
    #[serde(default)]
    pub path: String,
}

/// Log output configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files. Empty disables file logging.
    #[serde(default)]
    pub dir: String,
}

// Default value functions
fn default_source() -> String { "evdev".to_string() }
fn default_deadzone() -> f32 { 0.05 }
fn default_sample_queue_depth() -> usize { 64 }

fn default_linear_scale() -> f64 { 0.1 }
fn default_vertical_scale() -> f64 { 0.05 }
fn default_angular_scale() -> f64 { 0.2 }
fn default_smoothing_alpha() -> f64 { 0.3 }
fn default_boost_factor() -> f64 { 1.5 }
fn default_boost_delay_ms() -> u64 { 1000 }
fn default_trigger_floor() -> f64 { -0.8 }
fn default_advisory_interval_s() -> u64 { 10 }

fn default_frame_id() -> String { "base".to_string() }
fn default_twist_topic() -> String { "/robot/limb/right/command_twist_stamped".to_string() }
fn default_gripper_topic() -> String { "/robot/gripper/command".to_string() }

/// Supported values for `input.source`
const INPUT_SOURCES: &[&str] = &["evdev", "stdin"];

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            device_path: String::new(),
            deadzone: default_deadzone(),
            sample_queue_depth: default_sample_queue_depth(),
        }
    }
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            linear_scale: default_linear_scale(),
            vertical_scale: default_vertical_scale(),
            angular_scale: default_angular_scale(),
            smoothing_alpha: default_smoothing_alpha(),
            boost_factor: default_boost_factor(),
            boost_delay_ms: default_boost_delay_ms(),
            trigger_floor: default_trigger_floor(),
            advisory_interval_s: default_advisory_interval_s(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frame_id: default_frame_id(),
            twist_topic: default_twist_topic(),
            gripper_topic: default_gripper_topic(),
            path: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
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
    /// use arm_teleop::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate input configuration
        if !INPUT_SOURCES.contains(&self.input.source.as_str()) {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("input source must be one of: evdev, stdin")
            ));
        }

        if !(0.0..=0.25).contains(&self.input.deadzone) {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("deadzone must be between 0.0 and 0.25")
            ));
        }

        if self.input.sample_queue_depth == 0 {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("sample_queue_depth must be greater than 0")
            ));
        }

        // Validate scales
        for (name, value) in [
            ("linear_scale", self.teleop.linear_scale),
            ("vertical_scale", self.teleop.vertical_scale),
            ("angular_scale", self.teleop.angular_scale),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 10.0 {
                return Err(crate::error::TeleopError::Config(
                    toml::de::Error::custom(format!(
                        "{} must be greater than 0.0 and at most 10.0",
                        name
                    ))
                ));
            }
        }

        if !(self.teleop.smoothing_alpha > 0.0 && self.teleop.smoothing_alpha <= 1.0) {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("smoothing_alpha must be in (0.0, 1.0]")
            ));
        }

        if !(1.0..=10.0).contains(&self.teleop.boost_factor) {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("boost_factor must be between 1.0 and 10.0")
            ));
        }

        // Validate timing fields
        if self.teleop.boost_delay_ms == 0 || self.teleop.boost_delay_ms > 10000 {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("boost_delay_ms must be between 1 and 10000")
            ));
        }

        if self.teleop.advisory_interval_s == 0 {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("advisory_interval_s must be greater than 0")
            ));
        }

        if !(-1.0..=0.0).contains(&self.teleop.trigger_floor) {
            return Err(crate::error::TeleopError::Config(
                toml::de::Error::custom("trigger_floor must be between -1.0 and 0.0")
            ));
        }

        // Validate output naming
        for (name, value) in [
            ("frame_id", &self.output.frame_id),
            ("twist_topic", &self.output.twist_topic),
            ("gripper_topic", &self.output.gripper_topic),
        ] {
            if value.is_empty() {
                return Err(crate::error::TeleopError::Config(
                    toml::de::Error::custom(format!("{} cannot be empty", name))
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[input]
source = "stdin"

[teleop]
linear_scale = 0.25

[output]
frame_id = "world"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.input.source, "stdin");
        assert_eq!(config.teleop.linear_scale, 0.25);
        assert_eq!(config.teleop.angular_scale, 0.2);
        assert_eq!(config.output.frame_id, "world");
        assert_eq!(config.output.twist_topic, default_twist_topic());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.teleop.linear_scale, 0.1);
        assert_eq!(config.teleop.vertical_scale, 0.05);
        assert_eq!(config.teleop.angular_scale, 0.2);
        assert_eq!(config.input.source, "evdev");
        assert!(config.logging.dir.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/arm-teleop.toml");
        assert!(matches!(result, Err(crate::error::TeleopError::Io(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = Config::from_toml("[teleop\nlinear_scale = ");
        assert!(matches!(result, Err(crate::error::TeleopError::Config(_))));
    }

    #[test]
    fn test_invalid_source() {
        let mut config = Config::default();
        config.input.source = "joystick".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_negative() {
        let mut config = Config::default();
        config.input.deadzone = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_too_high() {
        let mut config = Config::default();
        config.input.deadzone = 0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_queue_depth_zero() {
        let mut config = Config::default();
        config.input.sample_queue_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_linear_scale_zero() {
        let mut config = Config::default();
        config.teleop.linear_scale = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_vertical_scale_nan() {
        let mut config = Config::default();
        config.teleop.vertical_scale = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_angular_scale_too_high() {
        let mut config = Config::default();
        config.teleop.angular_scale = 11.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_smoothing_alpha_bounds() {
        let mut config = Config::default();
        config.teleop.smoothing_alpha = 0.0;
        assert!(config.validate().is_err());

        config.teleop.smoothing_alpha = 1.0;
        assert!(config.validate().is_ok());

        config.teleop.smoothing_alpha = 1.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_boost_factor_below_one() {
        let mut config = Config::default();
        config.teleop.boost_factor = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_boost_delay_zero() {
        let mut config = Config::default();
        config.teleop.boost_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_boost_delay_too_high() {
        let mut config = Config::default();
        config.teleop.boost_delay_ms = 10001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_advisory_interval_zero() {
        let mut config = Config::default();
        config.teleop.advisory_interval_s = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trigger_floor_positive() {
        let mut config = Config::default();
        config.teleop.trigger_floor = 0.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_frame_id() {
        let mut config = Config::default();
        config.output.frame_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_gripper_topic() {
        let mut config = Config::default();
        config.output.gripper_topic = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_source(), "evdev");
        assert_eq!(default_deadzone(), 0.05);
        assert_eq!(default_sample_queue_depth(), 64);
        assert_eq!(default_linear_scale(), 0.1);
        assert_eq!(default_vertical_scale(), 0.05);
        assert_eq!(default_angular_scale(), 0.2);
        assert_eq!(default_smoothing_alpha(), 0.3);
        assert_eq!(default_boost_factor(), 1.5);
        assert_eq!(default_boost_delay_ms(), 1000);
        assert_eq!(default_trigger_floor(), -0.8);
        assert_eq!(default_advisory_interval_s(), 10);
        assert_eq!(default_frame_id(), "base");
        assert_eq!(default_twist_topic(), "/robot/limb/right/command_twist_stamped");
        assert_eq!(default_gripper_topic(), "/robot/gripper/command");
    }
}

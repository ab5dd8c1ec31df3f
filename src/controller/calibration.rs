//! # Calibration Module
//!
//! Converts raw evdev axis values into the normalized [-1, 1] range and
//! applies a deadzone.
//!
//! ## Deadzone
//!
//! The mapping downstream treats an axis as "released" only when it reads
//! exactly 0.0, so stick rest noise has to be snapped to zero here. Values
//! within the deadzone are mapped to 0.0, while values outside are scaled to
//! use the full range.
//!
//! ## Usage
//!
//! ```
//! use arm_teleop::controller::calibration::{AxisRange, Calibration};
//!
//! let range = AxisRange::new(0, 255);
//! let cal = Calibration::new(0.05);
//!
//! // Stick resting at 128 reads as exactly zero
//! assert_eq!(cal.apply(range.normalize(128)), 0.0);
//!
//! // Full deflection preserved
//! assert!((cal.apply(range.normalize(255)) - 1.0).abs() < 0.001);
//! ```

/// Applies a deadzone to a normalized input.
///
/// Input and output are in the range -1.0 to 1.0, where 0.0 is center.
#[derive(Debug, Clone, Copy)]
pub struct Calibration {
    /// Deadzone as a fraction (0.0 to 0.25).
    deadzone: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self { deadzone: 0.05 }
    }
}

impl Calibration {
    /// Creates a new calibration with the given deadzone.
    ///
    /// Values outside 0.0 to 0.25 are clamped.
    #[must_use]
    pub fn new(deadzone: f32) -> Self {
        Self {
            deadzone: deadzone.clamp(0.0, 0.25),
        }
    }

    /// Creates a linear calibration (no deadzone).
    ///
    /// # Examples
    ///
    /// ```
    /// use arm_teleop::controller::calibration::Calibration;
    ///
    /// let cal = Calibration::linear();
    /// assert!((cal.apply(0.02) - 0.02).abs() < 0.001);
    /// ```
    #[must_use]
    pub fn linear() -> Self {
        Self { deadzone: 0.0 }
    }

    /// Returns the configured deadzone value.
    #[must_use]
    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// Applies the deadzone to a normalized input.
    ///
    /// # Examples
    ///
    /// ```
    /// use arm_teleop::controller::calibration::Calibration;
    ///
    /// let cal = Calibration::new(0.05);
    ///
    /// // Within deadzone
    /// assert_eq!(cal.apply(0.02), 0.0);
    /// assert_eq!(cal.apply(-0.02), 0.0);
    ///
    /// // Full deflection preserved
    /// assert!((cal.apply(-1.0) - (-1.0)).abs() < 0.001);
    /// ```
    #[must_use]
    pub fn apply(&self, input: f32) -> f32 {
        let abs_input = input.abs();

        if abs_input <= self.deadzone {
            0.0
        } else {
            // Scale remaining range to 0..1
            input.signum() * (abs_input - self.deadzone) / (1.0 - self.deadzone)
        }
    }
}

/// Reported range of one absolute axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    /// Raw value at the negative end.
    pub min: i32,
    /// Raw value at the positive end.
    pub max: i32,
}

impl Default for AxisRange {
    /// The 8-bit range most USB pads report.
    fn default() -> Self {
        Self { min: 0, max: 255 }
    }
}

impl AxisRange {
    /// Creates an axis range.
    #[must_use]
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Maps a raw value to -1.0 (at `min`) .. 1.0 (at `max`).
    ///
    /// A degenerate range always yields 0.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use arm_teleop::controller::calibration::AxisRange;
    ///
    /// let range = AxisRange::new(-32768, 32767);
    /// assert!((range.normalize(-32768) - (-1.0)).abs() < 0.001);
    /// assert!((range.normalize(32767) - 1.0).abs() < 0.001);
    /// ```
    #[must_use]
    pub fn normalize(&self, raw: i32) -> f32 {
        let span = (self.max as f64) - (self.min as f64);
        if span <= 0.0 {
            return 0.0;
        }

        let unit = ((raw as f64) - (self.min as f64)) / span;
        ((unit * 2.0 - 1.0) as f32).clamp(-1.0, 1.0)
    }

    /// Maps a raw value to 1.0 (at `min`) .. -1.0 (at `max`).
    ///
    /// Used for vertical axes, where evdev reports "up" as the low end, and
    /// for triggers, which read +1 released and -1 pressed.
    #[must_use]
    pub fn normalize_inverted(&self, raw: i32) -> f32 {
        -self.normalize(raw)
    }
}

//! # Input Sample Module
//!
//! A [`JoySample`] is one complete report from the gamepad: 8 normalized axes
//! and 11 buttons, in the layout the controller uses in Xbox mode.
//!
//! ## Axis Layout
//!
//! | Index | Input | Range |
//! |-------|-------|-------|
//! | 0 | Left stick horizontal | left -1 .. right +1 |
//! | 1 | Left stick vertical | bottom -1 .. top +1 |
//! | 2 | Left trigger | 0 until first touched, pressed -1 .. released +1 |
//! | 3 | Right stick horizontal | left -1 .. right +1 |
//! | 4 | Right stick vertical | bottom -1 .. top +1 |
//! | 5 | Right trigger | 0 until first touched, pressed -1 .. released +1 |
//! | 6 | D-Pad horizontal | left -1 .. right +1 |
//! | 7 | D-Pad vertical | bottom -1 .. top +1 |
//!
//! The left trigger only travels to about -0.86 on the reference pad.
//!
//! ## Button Layout
//!
//! | Index | Button |
//! |-------|--------|
//! | 0 | A (bottom) |
//! | 1 | B (right), gripper |
//! | 2 | X (left) |
//! | 3 | Y (top) |
//! | 4 | Left bumper |
//! | 5 | Right bumper |
//! | 6 | Select |
//! | 7 | Start |
//! | 8 | Home |
//! | 9 | Left stick click |
//! | 10 | Right stick click |

use chrono::{DateTime, Utc};

use crate::error::{Result, TeleopError};

/// Number of axes in a device report.
pub const NUM_AXES: usize = 8;

/// Number of buttons in a device report.
pub const NUM_BUTTONS: usize = 11;

/// Axis indices for semantic access.
pub mod axes {
    /// Left stick horizontal
    pub const LEFT_STICK_X: usize = 0;
    /// Left stick vertical
    pub const LEFT_STICK_Y: usize = 1;
    /// Left trigger (L2)
    pub const LEFT_TRIGGER: usize = 2;
    /// Right stick horizontal
    pub const RIGHT_STICK_X: usize = 3;
    /// Right stick vertical
    pub const RIGHT_STICK_Y: usize = 4;
    /// Right trigger (R2)
    pub const RIGHT_TRIGGER: usize = 5;
    /// D-Pad horizontal
    pub const DPAD_X: usize = 6;
    /// D-Pad vertical
    pub const DPAD_Y: usize = 7;
}

/// Button indices for semantic access.
pub mod buttons {
    pub const A: usize = 0;
    pub const B: usize = 1;
    pub const X: usize = 2;
    pub const Y: usize = 3;
    pub const LEFT_BUMPER: usize = 4;
    pub const RIGHT_BUMPER: usize = 5;
    pub const SELECT: usize = 6;
    pub const START: usize = 7;
    pub const HOME: usize = 8;
    pub const LEFT_STICK: usize = 9;
    pub const RIGHT_STICK: usize = 10;
}

/// One gamepad report, immutable once received.
///
/// # Examples
///
/// ```
/// use arm_teleop::controller::sample::{JoySample, axes, buttons};
///
/// let sample = JoySample::new(chrono::Utc::now());
/// assert_eq!(sample.axis(axes::LEFT_TRIGGER), 0.0);
/// assert!(!sample.button(buttons::B));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JoySample {
    /// Normalized axis values in [-1, 1].
    pub axes: [f32; NUM_AXES],
    /// Button states, `true` = pressed.
    pub buttons: [bool; NUM_BUTTONS],
    /// Arrival time of the report.
    pub stamp: DateTime<Utc>,
}

impl JoySample {
    /// Creates a neutral sample: every axis at 0, every button released.
    #[must_use]
    pub fn new(stamp: DateTime<Utc>) -> Self {
        Self {
            axes: [0.0; NUM_AXES],
            buttons: [false; NUM_BUTTONS],
            stamp,
        }
    }

    /// Builds a sample from variable-length driver data.
    ///
    /// Extra axes or buttons beyond the fixed report are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::MalformedSample`] when fewer than
    /// [`NUM_AXES`] axes or [`NUM_BUTTONS`] buttons are supplied.
    ///
    /// # Examples
    ///
    /// ```
    /// use arm_teleop::controller::sample::JoySample;
    ///
    /// let now = chrono::Utc::now();
    /// assert!(JoySample::from_slices(&[0.0; 8], &[false; 11], now).is_ok());
    /// assert!(JoySample::from_slices(&[0.0; 6], &[false; 11], now).is_err());
    /// ```
    pub fn from_slices(axes: &[f32], buttons: &[bool], stamp: DateTime<Utc>) -> Result<Self> {
        if axes.len() < NUM_AXES || buttons.len() < NUM_BUTTONS {
            return Err(TeleopError::MalformedSample {
                axes: axes.len(),
                buttons: buttons.len(),
            });
        }

        let mut sample = Self::new(stamp);
        sample.axes.copy_from_slice(&axes[..NUM_AXES]);
        sample.buttons.copy_from_slice(&buttons[..NUM_BUTTONS]);
        Ok(sample)
    }

    /// Returns the axis value at `index` widened to `f64`.
    #[must_use]
    pub fn axis(&self, index: usize) -> f64 {
        f64::from(self.axes[index])
    }

    /// Returns whether the button at `index` is pressed.
    #[must_use]
    pub fn button(&self, index: usize) -> bool {
        self.buttons[index]
    }

    /// Returns the button at `index` as 1.0 (pressed) or 0.0 (released).
    #[must_use]
    pub fn button_value(&self, index: usize) -> f64 {
        if self.buttons[index] { 1.0 } else { 0.0 }
    }
}

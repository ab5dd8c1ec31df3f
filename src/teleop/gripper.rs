//! # Gripper Edge Detector
//!
//! Emits a gripper command whenever the gripper button changes state.
//! Pressed closes the gripper (position 0.0), released opens it (1.0).

use super::command::GripperCommand;

/// Tracks the last seen state of the gripper button.
///
/// The detector starts out assuming the button is pressed, so the first
/// sample with the button released opens the gripper.
///
/// # Examples
///
/// ```
/// use arm_teleop::teleop::gripper::GripperEdgeDetector;
///
/// let mut detector = GripperEdgeDetector::new();
/// assert_eq!(detector.observe(false).map(|c| c.position), Some(1.0));
/// assert!(detector.observe(false).is_none());
/// assert_eq!(detector.observe(true).map(|c| c.position), Some(0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GripperEdgeDetector {
    last_pressed: bool,
}

impl Default for GripperEdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GripperEdgeDetector {
    #[must_use]
    pub fn new() -> Self {
        Self { last_pressed: true }
    }

    /// Returns the last seen button state.
    #[must_use]
    pub fn last_pressed(&self) -> bool {
        self.last_pressed
    }

    /// Observes the button and returns a command on a state change.
    pub fn observe(&mut self, pressed: bool) -> Option<GripperCommand> {
        if pressed == self.last_pressed {
            return None;
        }

        self.last_pressed = pressed;
        let value = if pressed { 1.0 } else { 0.0 };
        Some(GripperCommand::new(1.0 - value))
    }
}

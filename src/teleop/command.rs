//! # Command Types
//!
//! Messages produced by the [`InputMapper`](super::InputMapper): a stamped
//! end-effector velocity and a gripper position.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Three-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Linear (m/s) and angular (rad/s) velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl Twist {
    /// Returns the six components in linear x/y/z, angular x/y/z order.
    #[must_use]
    pub fn components(&self) -> [f64; 6] {
        [
            self.linear.x,
            self.linear.y,
            self.linear.z,
            self.angular.x,
            self.angular.y,
            self.angular.z,
        ]
    }

    /// Inverse of [`Twist::components`].
    #[must_use]
    pub fn from_components(c: [f64; 6]) -> Self {
        Self {
            linear: Vector3 { x: c[0], y: c[1], z: c[2] },
            angular: Vector3 { x: c[3], y: c[4], z: c[5] },
        }
    }

    /// Returns true when every component is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.components().iter().all(|&c| c == 0.0)
    }
}

/// Stamp and reference frame of a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub stamp: DateTime<Utc>,
    pub frame_id: String,
}

/// Desired end-effector velocity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityCommand {
    pub header: Header,
    pub twist: Twist,
}

/// Gripper position command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GripperCommand {
    /// 1.0 = open, 0.0 = closed.
    pub position: f64,
    /// Always 0.0; consumers apply their own effort limit.
    pub max_effort: f64,
}

impl GripperCommand {
    /// Creates a command for `position` with no effort limit.
    #[must_use]
    pub fn new(position: f64) -> Self {
        Self {
            position,
            max_effort: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twist_default_is_zero() {
        assert!(Twist::default().is_zero());
    }

    #[test]
    fn test_components_order() {
        let mut twist = Twist::default();
        twist.linear.z = 3.0;
        twist.angular.x = 4.0;
        assert_eq!(twist.components(), [0.0, 0.0, 3.0, 4.0, 0.0, 0.0]);
        assert_eq!(Twist::from_components(twist.components()), twist);
        assert!(!twist.is_zero());
    }

    #[test]
    fn test_velocity_command_json() {
        let stamp = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let command = VelocityCommand {
            header: Header { stamp, frame_id: "base".to_string() },
            twist: Twist::default(),
        };

        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["header"]["frame_id"], "base");
        assert_eq!(json["twist"]["linear"]["x"], 0.0);
        assert_eq!(json["twist"]["angular"]["z"], 0.0);
    }

    #[test]
    fn test_gripper_command_new() {
        let command = GripperCommand::new(1.0);
        assert_eq!(command.position, 1.0);
        assert_eq!(command.max_effort, 0.0);
    }
}

//! # Teleop Module
//!
//! Maps gamepad samples to arm commands.
//!
//! This module handles:
//! - Holding motion output back until both triggers have been touched
//! - Stick, trigger and bumper mapping with hold-to-boost
//! - Exponential smoothing of the velocity command
//! - Gripper open/close on button transitions

pub mod command;
pub mod gate;
pub mod gripper;
pub mod input_mapper;
pub mod latch;
pub mod smoother;

pub use command::{GripperCommand, Twist, VelocityCommand};
pub use input_mapper::{InputMapper, MapperOutput};

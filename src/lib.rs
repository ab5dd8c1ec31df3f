//! # Arm Teleop Library
//!
//! Drive a robotic arm's end effector and gripper from a gamepad.
//!
//! This library provides the core functionality for turning gamepad samples
//! into smoothed end-effector velocity commands and gripper open/close
//! commands.

pub mod config;
pub mod error;
pub mod controller;
pub mod output;
pub mod session;
pub mod teleop;

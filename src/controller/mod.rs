//! # Controller Module
//!
//! Gamepad input handling.
//!
//! This module handles:
//! - Gamepad detection and connection via evdev
//! - Normalizing raw axis values and applying a deadzone
//! - Assembling device reports into fixed-shape samples
//! - Reading samples as JSON lines when no device is attached

pub mod calibration;
pub mod gamepad;
pub mod joy_message;
pub mod mapper;
pub mod sample;

pub use sample::JoySample;

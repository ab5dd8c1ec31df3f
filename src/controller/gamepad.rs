//! # Gamepad Device Module
//!
//! This module handles gamepad detection, connection, and input reading
//! using the Linux evdev interface.
//!
//! ## Controller Detection
//!
//! A device is treated as a gamepad when it exposes both analog sticks
//! (ABS_X/ABS_Y and ABS_RX/ABS_RY) and the south face button (BTN_SOUTH).
//! Axis ranges are read from the device's absinfo so that pads reporting
//! 8-bit or 16-bit values normalize the same way.

use chrono::Utc;
use evdev::{AbsoluteAxisType, Device, Key};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::calibration::{AxisRange, Calibration};
use super::mapper::{EventMapper, AXIS_MAP};
use super::sample::{JoySample, NUM_AXES};
use crate::error::{Result, TeleopError};

/// Directory scanned for event devices.
const INPUT_DIR: &str = "/dev/input";

/// Gamepad handle
///
/// Represents an active connection to a gamepad via evdev.
pub struct Gamepad {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for Gamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamepad")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

/// Returns true when `device` looks like a dual-stick gamepad.
fn is_gamepad(device: &Device) -> bool {
    let has_axes = device.supported_absolute_axes().map_or(false, |axes| {
        [
            AbsoluteAxisType::ABS_X,
            AbsoluteAxisType::ABS_Y,
            AbsoluteAxisType::ABS_RX,
            AbsoluteAxisType::ABS_RY,
        ]
        .iter()
        .all(|&axis| axes.contains(axis))
    });
    let has_buttons = device
        .supported_keys()
        .map_or(false, |keys| keys.contains(Key::BTN_SOUTH));

    has_axes && has_buttons
}

impl Gamepad {
    /// Open a gamepad
    ///
    /// With `Some(path)` the device at that path is opened directly. With
    /// `None`, all `/dev/input/event*` devices are scanned in sorted order
    /// and the first one that looks like a gamepad is used.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: No gamepad found on the system
    /// - `Controller`: The configured device could not be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use arm_teleop::controller::gamepad::Gamepad;
    ///
    /// let gamepad = Gamepad::open(None)?;
    /// println!("Connected to gamepad at: {}", gamepad.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(device_path: Option<&str>) -> Result<Self> {
        if let Some(path) = device_path {
            let device = Device::open(path)
                .map_err(|e| TeleopError::Controller(format!("Failed to open {}: {}", path, e)))?;
            if !is_gamepad(&device) {
                warn!("{} does not report the usual gamepad axes, using it anyway", path);
            }
            info!("Opened gamepad at: {}", path);
            return Ok(Self {
                device,
                device_path: path.to_string(),
            });
        }

        Self::scan(Path::new(INPUT_DIR))
    }

    /// Scan `input_dir` for the first gamepad.
    fn scan(input_dir: &Path) -> Result<Self> {
        if !input_dir.exists() {
            return Err(TeleopError::Controller(format!(
                "{} directory not found",
                input_dir.display()
            )));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| {
                TeleopError::Controller(format!("Failed to read {}: {}", input_dir.display(), e))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                TeleopError::Controller(format!("Failed to read directory entry: {}", e))
            })?;

        // Sort entries for deterministic device selection when multiple pads are connected
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .map_or(false, |name| name.to_string_lossy().starts_with("event"));
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    debug!(
                        "Found input device: {} ({})",
                        path.display(),
                        device.name().unwrap_or("unnamed")
                    );

                    if is_gamepad(&device) {
                        let device_path = path.to_string_lossy().to_string();
                        info!("Found gamepad at: {}", device_path);
                        return Ok(Self { device, device_path });
                    }
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(TeleopError::ControllerNotFound)
    }

    /// Get the device path of this gamepad
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Get gamepad name from evdev
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }

    /// Read the per-axis ranges from the device, indexed by sample axis.
    ///
    /// Axes whose absinfo cannot be read keep the 8-bit default range.
    pub fn axis_ranges(&self) -> [AxisRange; NUM_AXES] {
        let mut ranges = [AxisRange::default(); NUM_AXES];

        match self.device.get_abs_state() {
            Ok(state) => {
                for (code, index, _) in AXIS_MAP {
                    let info = state[code.0 as usize];
                    if info.maximum > info.minimum {
                        ranges[index] = AxisRange::new(info.minimum, info.maximum);
                    } else {
                        debug!("Axis {:?} reports no range, keeping default", code);
                    }
                }
            }
            Err(e) => warn!("Could not read axis ranges from {}: {}", self.device_path, e),
        }

        ranges
    }

    /// Fetch events from the gamepad
    ///
    /// This call blocks until events are available.
    ///
    /// # Errors
    ///
    /// Returns `Controller` error if fetching events fails (e.g., disconnected).
    pub fn fetch_events(&mut self) -> Result<impl Iterator<Item = evdev::InputEvent> + '_> {
        self.device
            .fetch_events()
            .map_err(|e| TeleopError::Controller(format!("Failed to fetch events: {}", e)))
    }

    /// Read the gamepad until it disconnects or `tx` is closed.
    ///
    /// One [`JoySample`] is sent per device report. Intended to run on a
    /// blocking thread (`tokio::task::spawn_blocking`).
    ///
    /// # Errors
    ///
    /// Returns `Controller` error when the device stops delivering events.
    pub fn run_blocking(mut self, deadzone: f32, tx: mpsc::Sender<JoySample>) -> Result<()> {
        let mut mapper = EventMapper::with_ranges(self.axis_ranges(), Calibration::new(deadzone));
        info!("Reading gamepad {} ({})", self.device_path, self.name().unwrap_or("unnamed"));

        loop {
            let mut ready = Vec::new();
            for event in self.fetch_events()? {
                if mapper.process_event(&event) {
                    ready.push(mapper.snapshot(Utc::now()));
                }
            }

            for sample in ready {
                if tx.blocking_send(sample).is_err() {
                    debug!("Sample receiver closed, stopping gamepad reader");
                    return Ok(());
                }
            }
        }
    }
}

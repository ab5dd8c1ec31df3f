//! # Controller Input Mapper Module
//!
//! This module handles parsing raw evdev events from an Xbox-mode gamepad
//! and accumulating them into a [`JoySample`].
//!
//! ## Event Types
//!
//! - **EV_ABS (Absolute Axis)**: sticks, triggers, d-pad
//! - **EV_KEY (Key/Button)**: digital buttons
//! - **EV_SYN (SYN_REPORT)**: end of one device report
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Sample index | Orientation |
//! |------|------------|--------------|-------------|
//! | Left Stick X | ABS_X | 0 | as reported |
//! | Left Stick Y | ABS_Y | 1 | inverted (up = +1) |
//! | Left Trigger | ABS_Z | 2 | inverted (pressed = -1) |
//! | Right Stick X | ABS_RX | 3 | as reported |
//! | Right Stick Y | ABS_RY | 4 | inverted (up = +1) |
//! | Right Trigger | ABS_RZ | 5 | inverted (pressed = -1) |
//! | D-Pad X | ABS_HAT0X | 6 | as reported |
//! | D-Pad Y | ABS_HAT0Y | 7 | inverted (up = +1) |
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code | Sample index |
//! |--------|------------|--------------|
//! | A | BTN_SOUTH | 0 |
//! | B | BTN_EAST | 1 |
//! | X | BTN_NORTH | 2 |
//! | Y | BTN_WEST | 3 |
//! | LB | BTN_TL | 4 |
//! | RB | BTN_TR | 5 |
//! | Back | BTN_SELECT | 6 |
//! | Start | BTN_START | 7 |
//! | Home | BTN_MODE | 8 |
//! | L3 | BTN_THUMBL | 9 |
//! | R3 | BTN_THUMBR | 10 |
//!
//! The xpad driver reports X as `BTN_NORTH` and Y as `BTN_WEST`.
//!
//! Axes start at 0.0 and keep that value until the device reports them for
//! the first time. For triggers this means "never touched" reads 0.0 rather
//! than the released value +1.0.

use chrono::{DateTime, Utc};
use evdev::{AbsoluteAxisType, InputEvent, InputEventKind, Key, Synchronization};

use super::calibration::{AxisRange, Calibration};
use super::sample::{axes, buttons, JoySample, NUM_AXES};

/// evdev axis code, sample index and whether the axis is inverted.
pub const AXIS_MAP: [(AbsoluteAxisType, usize, bool); NUM_AXES] = [
    (AbsoluteAxisType::ABS_X, axes::LEFT_STICK_X, false),
    (AbsoluteAxisType::ABS_Y, axes::LEFT_STICK_Y, true),
    (AbsoluteAxisType::ABS_Z, axes::LEFT_TRIGGER, true),
    (AbsoluteAxisType::ABS_RX, axes::RIGHT_STICK_X, false),
    (AbsoluteAxisType::ABS_RY, axes::RIGHT_STICK_Y, true),
    (AbsoluteAxisType::ABS_RZ, axes::RIGHT_TRIGGER, true),
    (AbsoluteAxisType::ABS_HAT0X, axes::DPAD_X, false),
    (AbsoluteAxisType::ABS_HAT0Y, axes::DPAD_Y, true),
];

/// Parses raw evdev events and maintains the current sample.
///
/// # Thread Safety
///
/// `EventMapper` is not thread-safe. Use from a single task/thread only.
///
/// # Examples
///
/// ```
/// use arm_teleop::controller::mapper::EventMapper;
///
/// let mapper = EventMapper::new();
/// let sample = mapper.snapshot(chrono::Utc::now());
/// assert_eq!(sample.axes[0], 0.0);
/// ```
#[derive(Debug)]
pub struct EventMapper {
    axes: [f32; NUM_AXES],
    buttons: [bool; super::sample::NUM_BUTTONS],
    ranges: [AxisRange; NUM_AXES],
    calibration: Calibration,
}

impl Default for EventMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl EventMapper {
    /// Creates a mapper assuming 8-bit sticks/triggers, -1..1 hats and the
    /// default deadzone.
    #[must_use]
    pub fn new() -> Self {
        let mut ranges = [AxisRange::default(); NUM_AXES];
        ranges[axes::DPAD_X] = AxisRange::new(-1, 1);
        ranges[axes::DPAD_Y] = AxisRange::new(-1, 1);
        Self::with_ranges(ranges, Calibration::default())
    }

    /// Creates a mapper from per-axis ranges (indexed by sample axis) and a
    /// deadzone calibration.
    #[must_use]
    pub fn with_ranges(ranges: [AxisRange; NUM_AXES], calibration: Calibration) -> Self {
        Self {
            axes: [0.0; NUM_AXES],
            buttons: [false; super::sample::NUM_BUTTONS],
            ranges,
            calibration,
        }
    }

    /// Returns the range used for the axis at sample index `index`.
    #[must_use]
    pub fn range(&self, index: usize) -> AxisRange {
        self.ranges[index]
    }

    /// Copies the accumulated state into a sample stamped with `stamp`.
    #[must_use]
    pub fn snapshot(&self, stamp: DateTime<Utc>) -> JoySample {
        JoySample {
            axes: self.axes,
            buttons: self.buttons,
            stamp,
        }
    }

    /// Processes a single evdev input event and updates internal state.
    ///
    /// Returns `true` when the event closes a device report (`SYN_REPORT`),
    /// i.e. when the accumulated state is ready to be snapshotted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use arm_teleop::controller::mapper::EventMapper;
    /// use arm_teleop::controller::gamepad::Gamepad;
    ///
    /// let mut gamepad = Gamepad::open(None)?;
    /// let mut mapper = EventMapper::new();
    ///
    /// for event in gamepad.fetch_events()? {
    ///     if mapper.process_event(&event) {
    ///         let sample = mapper.snapshot(chrono::Utc::now());
    ///     }
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => {
                self.process_axis_event(axis, event.value());
                false
            }
            InputEventKind::Key(key) => {
                self.process_key_event(key, event.value() != 0);
                false
            }
            InputEventKind::Synchronization(Synchronization::SYN_REPORT) => true,
            _ => false,
        }
    }

    /// Processes an absolute axis event.
    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        let Some(&(_, index, inverted)) = AXIS_MAP.iter().find(|(code, _, _)| *code == axis) else {
            // Ignore gyro, accelerometer, etc.
            return;
        };

        let range = self.ranges[index];
        let normalized = if inverted {
            range.normalize_inverted(value)
        } else {
            range.normalize(value)
        };
        self.axes[index] = self.calibration.apply(normalized);
    }

    /// Processes a key/button event.
    fn process_key_event(&mut self, key: Key, pressed: bool) {
        let index = match key {
            Key::BTN_SOUTH => buttons::A,
            Key::BTN_EAST => buttons::B,
            Key::BTN_NORTH => buttons::X,
            Key::BTN_WEST => buttons::Y,
            Key::BTN_TL => buttons::LEFT_BUMPER,
            Key::BTN_TR => buttons::RIGHT_BUMPER,
            Key::BTN_SELECT => buttons::SELECT,
            Key::BTN_START => buttons::START,
            Key::BTN_MODE => buttons::HOME,
            Key::BTN_THUMBL => buttons::LEFT_STICK,
            Key::BTN_THUMBR => buttons::RIGHT_STICK,
            _ => return,
        };
        self.buttons[index] = pressed;
    }

    /// Resets all state to neutral (every axis 0, every button released).
    ///
    /// Useful when reconnecting a controller.
    pub fn reset(&mut self) {
        self.axes = [0.0; NUM_AXES];
        self.buttons = [false; super::sample::NUM_BUTTONS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::EventType;

    /// Helper to create an axis event for testing.
    fn make_axis_event(axis: AbsoluteAxisType, value: i32) -> InputEvent {
        InputEvent::new(EventType::ABSOLUTE, axis.0, value)
    }

    /// Helper to create a key event for testing.
    fn make_key_event(key: Key, pressed: bool) -> InputEvent {
        InputEvent::new(EventType::KEY, key.code(), if pressed { 1 } else { 0 })
    }

    /// Helper to create a SYN_REPORT event.
    fn make_syn_event() -> InputEvent {
        InputEvent::new(EventType::SYNCHRONIZATION, Synchronization::SYN_REPORT.0, 0)
    }

    #[test]
    fn test_event_mapper_new_is_neutral() {
        let mapper = EventMapper::new();
        let sample = mapper.snapshot(Utc::now());
        assert!(sample.axes.iter().all(|&a| a == 0.0));
        assert!(sample.buttons.iter().all(|&b| !b));
    }

    #[test]
    fn test_default_ranges() {
        let mapper = EventMapper::default();
        assert_eq!(mapper.range(axes::LEFT_STICK_X), AxisRange::new(0, 255));
        assert_eq!(mapper.range(axes::DPAD_Y), AxisRange::new(-1, 1));
    }

    #[test]
    fn test_syn_report_completes_sample() {
        let mut mapper = EventMapper::new();
        assert!(!mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, 255)));
        assert!(mapper.process_event(&make_syn_event()));
    }

    #[test]
    fn test_left_stick_horizontal() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, 255));
        let sample = mapper.snapshot(Utc::now());
        assert!((sample.axes[axes::LEFT_STICK_X] - 1.0).abs() < 0.001);

        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, 0));
        let sample = mapper.snapshot(Utc::now());
        assert!((sample.axes[axes::LEFT_STICK_X] - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_vertical_stick_inverted() {
        let mut mapper = EventMapper::new();
        // evdev reports stick up as the low end of the range
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_Y, 0));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RY, 255));
        let sample = mapper.snapshot(Utc::now());
        assert!((sample.axes[axes::LEFT_STICK_Y] - 1.0).abs() < 0.001);
        assert!((sample.axes[axes::RIGHT_STICK_Y] - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_stick_center_reads_zero() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RX, 200));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RX, 128));
        let sample = mapper.snapshot(Utc::now());
        assert_eq!(sample.axes[axes::RIGHT_STICK_X], 0.0);
    }

    #[test]
    fn test_trigger_untouched_then_released() {
        let mut mapper = EventMapper::new();
        assert_eq!(mapper.snapshot(Utc::now()).axes[axes::LEFT_TRIGGER], 0.0);

        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_Z, 255));
        let pressed = mapper.snapshot(Utc::now());
        assert!((pressed.axes[axes::LEFT_TRIGGER] - (-1.0)).abs() < 0.001);

        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_Z, 0));
        let released = mapper.snapshot(Utc::now());
        assert!((released.axes[axes::LEFT_TRIGGER] - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_right_trigger_code() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_RZ, 255));
        let sample = mapper.snapshot(Utc::now());
        assert!((sample.axes[axes::RIGHT_TRIGGER] - (-1.0)).abs() < 0.001);
        assert_eq!(sample.axes[axes::LEFT_TRIGGER], 0.0);
    }

    #[test]
    fn test_dpad() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0X, 1));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_HAT0Y, -1));
        let sample = mapper.snapshot(Utc::now());
        assert_eq!(sample.axes[axes::DPAD_X], 1.0);
        // Up on the d-pad reads +1
        assert_eq!(sample.axes[axes::DPAD_Y], 1.0);
    }

    #[test]
    fn test_custom_ranges() {
        let mut ranges = [AxisRange::new(-32768, 32767); NUM_AXES];
        ranges[axes::LEFT_TRIGGER] = AxisRange::new(0, 1023);
        let mut mapper = EventMapper::with_ranges(ranges, Calibration::linear());

        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, 32767));
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_Z, 1023));
        let sample = mapper.snapshot(Utc::now());
        assert!((sample.axes[axes::LEFT_STICK_X] - 1.0).abs() < 0.001);
        assert!((sample.axes[axes::LEFT_TRIGGER] - (-1.0)).abs() < 0.001);
    }

    #[test]
    fn test_ignores_unknown_axis() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_PRESSURE, 100));
        let sample = mapper.snapshot(Utc::now());
        assert!(sample.axes.iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_all_buttons() {
        let cases = [
            (Key::BTN_SOUTH, buttons::A),
            (Key::BTN_EAST, buttons::B),
            (Key::BTN_NORTH, buttons::X),
            (Key::BTN_WEST, buttons::Y),
            (Key::BTN_TL, buttons::LEFT_BUMPER),
            (Key::BTN_TR, buttons::RIGHT_BUMPER),
            (Key::BTN_SELECT, buttons::SELECT),
            (Key::BTN_START, buttons::START),
            (Key::BTN_MODE, buttons::HOME),
            (Key::BTN_THUMBL, buttons::LEFT_STICK),
            (Key::BTN_THUMBR, buttons::RIGHT_STICK),
        ];

        for (key, index) in cases {
            let mut mapper = EventMapper::new();
            mapper.process_event(&make_key_event(key, true));
            let sample = mapper.snapshot(Utc::now());
            assert!(sample.buttons[index], "Button {:?} should map to index {}", key, index);
            assert_eq!(sample.buttons.iter().filter(|&&b| b).count(), 1);

            mapper.process_event(&make_key_event(key, false));
            assert!(!mapper.snapshot(Utc::now()).buttons[index]);
        }
    }

    #[test]
    fn test_ignores_unknown_key() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_key_event(Key::KEY_A, true));
        let sample = mapper.snapshot(Utc::now());
        assert!(sample.buttons.iter().all(|&b| !b));
    }

    #[test]
    fn test_reset() {
        let mut mapper = EventMapper::new();
        mapper.process_event(&make_axis_event(AbsoluteAxisType::ABS_X, 255));
        mapper.process_event(&make_key_event(Key::BTN_EAST, true));
        mapper.reset();
        let sample = mapper.snapshot(Utc::now());
        assert!(sample.axes.iter().all(|&a| a == 0.0));
        assert!(sample.buttons.iter().all(|&b| !b));
    }
}

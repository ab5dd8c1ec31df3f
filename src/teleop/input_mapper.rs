//! # Input Mapper
//!
//! Turns each [`JoySample`] into one smoothed [`VelocityCommand`] and, when
//! the gripper button changes, one [`GripperCommand`].
//!
//! ## Mapping
//!
//! | Input | Output | Scale | Sign |
//! |-------|--------|-------|------|
//! | Left stick vertical | linear X | linear | negated |
//! | Left stick horizontal | linear Y | linear | negated |
//! | L2 − R2 (floored at -0.8) | linear Z | vertical | as is |
//! | Right stick horizontal | angular X | angular | as is |
//! | Right stick vertical | angular Y | angular | negated |
//! | LB − RB | angular Z | angular | as is |
//! | B button | gripper | - | pressed closes |
//!
//! Stick and bumper channels boost after being held (see
//! [`BoostLatch`]). Everything except the gripper is suppressed until the
//! [`InitializationGate`] opens.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, trace};

use super::command::{GripperCommand, Header, Twist, VelocityCommand};
use super::gate::InitializationGate;
use super::gripper::GripperEdgeDetector;
use super::latch::{Boost, BoostLatch, Channel};
use super::smoother::ExponentialSmoother;
use crate::config::TeleopConfig;
use crate::controller::sample::{axes, buttons, JoySample};

/// Commands produced for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MapperOutput {
    /// Always present, zero before initialization.
    pub velocity: VelocityCommand,
    /// Present only on a gripper button transition.
    pub gripper: Option<GripperCommand>,
}

/// Converts a millisecond/second setting into a `TimeDelta`.
fn delta_from(duration: std::time::Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

/// Gamepad → arm command mapper. Owns all per-session state.
///
/// # Examples
///
/// ```
/// use arm_teleop::config::TeleopConfig;
/// use arm_teleop::controller::sample::JoySample;
/// use arm_teleop::teleop::InputMapper;
///
/// let mut mapper = InputMapper::new(&TeleopConfig::default(), "base");
/// let output = mapper.process(&JoySample::new(chrono::Utc::now()));
///
/// assert!(output.velocity.twist.is_zero());
/// assert_eq!(output.velocity.header.frame_id, "base");
/// ```
#[derive(Debug, Clone)]
pub struct InputMapper {
    linear_scale: f64,
    vertical_scale: f64,
    angular_scale: f64,
    trigger_floor: f64,
    boost: Boost,
    frame_id: String,
    gate: InitializationGate,
    latches: [BoostLatch; Channel::COUNT],
    gripper: GripperEdgeDetector,
    smoother: ExponentialSmoother,
}

impl InputMapper {
    /// Creates a mapper from the teleop settings. `frame_id` labels every
    /// velocity command.
    #[must_use]
    pub fn new(config: &TeleopConfig, frame_id: impl Into<String>) -> Self {
        let advisory_interval =
            delta_from(std::time::Duration::from_secs(config.advisory_interval_s));

        Self {
            linear_scale: config.linear_scale,
            vertical_scale: config.vertical_scale,
            angular_scale: config.angular_scale,
            trigger_floor: config.trigger_floor,
            boost: Boost {
                factor: config.boost_factor,
                delay: delta_from(std::time::Duration::from_millis(config.boost_delay_ms)),
            },
            frame_id: frame_id.into(),
            gate: InitializationGate::new(advisory_interval),
            latches: [BoostLatch::default(); Channel::COUNT],
            gripper: GripperEdgeDetector::new(),
            smoother: ExponentialSmoother::new(config.smoothing_alpha),
        }
    }

    /// Returns whether both triggers have been touched.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.gate.is_open()
    }

    /// Returns the latch of `channel`.
    #[must_use]
    pub fn latch(&self, channel: Channel) -> &BoostLatch {
        &self.latches[channel.index()]
    }

    /// Returns the initialization gate.
    #[must_use]
    pub fn gate(&self) -> &InitializationGate {
        &self.gate
    }

    /// Processes one sample: gripper edge, raw mapping, smoothing.
    pub fn process(&mut self, sample: &JoySample) -> MapperOutput {
        let gripper = self.gripper.observe(sample.button(buttons::B));
        if let Some(command) = &gripper {
            debug!("Gripper command: position {}", command.position);
        }

        let raw = self.map_twist(sample);
        let twist = self.smoother.smooth(raw);
        trace!(?raw, ?twist, "Mapped sample");

        MapperOutput {
            velocity: VelocityCommand {
                header: Header {
                    stamp: sample.stamp,
                    frame_id: self.frame_id.clone(),
                },
                twist,
            },
            gripper,
        }
    }

    /// Maps a sample to an unsmoothed twist, updating gate and latches.
    fn map_twist(&mut self, sample: &JoySample) -> Twist {
        let now = sample.stamp;
        let left_trigger = sample.axis(axes::LEFT_TRIGGER);
        let right_trigger = sample.axis(axes::RIGHT_TRIGGER);
        let armed = self.gate.observe(left_trigger, right_trigger, now);

        let left_x = sample.axis(axes::LEFT_STICK_X);
        let left_y = sample.axis(axes::LEFT_STICK_Y);
        let right_x = sample.axis(axes::RIGHT_STICK_X);
        let right_y = sample.axis(axes::RIGHT_STICK_Y);
        let bumpers_engaged =
            sample.button(buttons::LEFT_BUMPER) || sample.button(buttons::RIGHT_BUMPER);
        let bumpers = sample.button_value(buttons::LEFT_BUMPER)
            - sample.button_value(buttons::RIGHT_BUMPER);

        let mut twist = Twist::default();
        twist.linear.x = -self.linear_scale * self.stick(Channel::LeftStickY, left_y, armed, now);
        twist.linear.y = -self.linear_scale * self.stick(Channel::LeftStickX, left_x, armed, now);
        twist.angular.x =
            self.angular_scale * self.stick(Channel::RightStickX, right_x, armed, now);
        twist.angular.y =
            -self.angular_scale * self.stick(Channel::RightStickY, right_y, armed, now);
        twist.angular.z =
            self.angular_scale * self.held(Channel::Bumpers, bumpers, bumpers_engaged, armed, now);

        if armed {
            let left = left_trigger.max(self.trigger_floor);
            let right = right_trigger.max(self.trigger_floor);
            twist.linear.z = self.vertical_scale * (left - right);
        }

        twist
    }

    /// Stick channels count as held while their axis is off zero.
    fn stick(&mut self, channel: Channel, raw: f64, armed: bool, now: DateTime<Utc>) -> f64 {
        self.held(channel, raw, raw != 0.0, armed, now)
    }

    /// Updates the latch of `channel` and returns the boost-adjusted input.
    fn held(
        &mut self,
        channel: Channel,
        raw: f64,
        engaged: bool,
        armed: bool,
        now: DateTime<Utc>,
    ) -> f64 {
        let latch = &mut self.latches[channel.index()];
        latch.update(engaged, armed, now);
        latch.output(raw, now, &self.boost)
    }
}

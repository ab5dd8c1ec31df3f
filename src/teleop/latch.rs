//! # Boost Latch
//!
//! Each gated input channel has a latch that remembers when the operator
//! started holding it. Holding a channel for the boost delay multiplies its
//! output by the boost factor; releasing it (raw value back to exactly 0)
//! resets the timer.

use chrono::{DateTime, TimeDelta, Utc};

/// Gated input channels, one latch each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Left stick horizontal → linear Y
    LeftStickX,
    /// Left stick vertical → linear X
    LeftStickY,
    /// Right stick horizontal → angular X
    RightStickX,
    /// Right stick vertical → angular Y
    RightStickY,
    /// Bumper pair → angular Z
    Bumpers,
}

impl Channel {
    /// Number of gated channels.
    pub const COUNT: usize = 5;

    /// Position of this channel's latch.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Channel::LeftStickX => 0,
            Channel::LeftStickY => 1,
            Channel::RightStickX => 2,
            Channel::RightStickY => 3,
            Channel::Bumpers => 4,
        }
    }
}

/// Hold-to-boost parameters shared by all channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boost {
    /// Multiplier applied once the hold delay has elapsed.
    pub factor: f64,
    /// Hold time before the multiplier applies.
    pub delay: TimeDelta,
}

impl Default for Boost {
    fn default() -> Self {
        Self {
            factor: 1.5,
            delay: TimeDelta::seconds(1),
        }
    }
}

/// Activation state of one channel.
///
/// # Examples
///
/// ```
/// use arm_teleop::teleop::latch::{Boost, BoostLatch};
/// use chrono::{TimeDelta, Utc};
///
/// let t0 = Utc::now();
/// let mut latch = BoostLatch::default();
///
/// latch.update(true, true, t0);
/// assert_eq!(latch.output(0.5, t0, &Boost::default()), 0.5);
///
/// let later = t0 + TimeDelta::seconds(2);
/// latch.update(true, true, later);
/// assert_eq!(latch.output(0.5, later, &Boost::default()), 0.75);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoostLatch {
    activated_at: Option<DateTime<Utc>>,
}

impl BoostLatch {
    /// Returns whether the channel is currently held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }

    /// Returns the time the current hold started.
    #[must_use]
    pub fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// Updates the latch for one sample.
    ///
    /// * `engaged` - the channel's raw input is non-zero this sample
    /// * `armed` - new holds may start (the initialization gate is open)
    /// * `now` - arrival time of the sample
    ///
    /// A release always clears the latch; a hold only starts while armed.
    pub fn update(&mut self, engaged: bool, armed: bool, now: DateTime<Utc>) {
        if !engaged {
            self.activated_at = None;
        } else if self.activated_at.is_none() && armed {
            self.activated_at = Some(now);
        }
    }

    /// Returns `raw` adjusted for the hold state: 0.0 when inactive, `raw`
    /// during the first `boost.delay` of a hold and `raw * boost.factor`
    /// afterwards.
    #[must_use]
    pub fn output(&self, raw: f64, now: DateTime<Utc>, boost: &Boost) -> f64 {
        match self.activated_at {
            None => 0.0,
            Some(since) if now - since >= boost.delay => raw * boost.factor,
            Some(_) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + TimeDelta::milliseconds(ms)
    }

    #[test]
    fn test_channel_indices_unique() {
        let all = [
            Channel::LeftStickX,
            Channel::LeftStickY,
            Channel::RightStickX,
            Channel::RightStickY,
            Channel::Bumpers,
        ];
        let mut seen = [false; Channel::COUNT];
        for channel in all {
            assert!(!seen[channel.index()], "{:?} reuses an index", channel);
            seen[channel.index()] = true;
        }
    }

    #[test]
    fn test_inactive_outputs_zero() {
        let latch = BoostLatch::default();
        assert!(!latch.is_active());
        assert_eq!(latch.output(1.0, t(0), &Boost::default()), 0.0);
    }

    #[test]
    fn test_activation_records_time() {
        let mut latch = BoostLatch::default();
        latch.update(true, true, t(100));
        assert_eq!(latch.activated_at(), Some(t(100)));

        // Staying engaged keeps the first activation time
        latch.update(true, true, t(500));
        assert_eq!(latch.activated_at(), Some(t(100)));
    }

    #[test]
    fn test_not_armed_does_not_activate() {
        let mut latch = BoostLatch::default();
        latch.update(true, false, t(0));
        assert!(!latch.is_active());
        assert_eq!(latch.output(0.8, t(0), &Boost::default()), 0.0);
    }

    #[test]
    fn test_release_clears() {
        let mut latch = BoostLatch::default();
        latch.update(true, true, t(0));
        latch.update(false, true, t(10));
        assert!(!latch.is_active());

        // Release also clears while not armed
        latch.update(true, true, t(20));
        latch.update(false, false, t(30));
        assert!(!latch.is_active());
    }

    #[test]
    fn test_boost_after_delay() {
        let boost = Boost::default();
        let mut latch = BoostLatch::default();
        latch.update(true, true, t(0));

        assert_eq!(latch.output(-0.4, t(999), &boost), -0.4);
        assert!((latch.output(-0.4, t(1000), &boost) - (-0.6)).abs() < 1e-12);
        assert!((latch.output(-0.4, t(5000), &boost) - (-0.6)).abs() < 1e-12);
    }

    #[test]
    fn test_rehold_restarts_timer() {
        let boost = Boost::default();
        let mut latch = BoostLatch::default();
        latch.update(true, true, t(0));
        latch.update(false, true, t(1500));
        latch.update(true, true, t(1600));
        assert_eq!(latch.output(1.0, t(2000), &boost), 1.0);
    }

    #[test]
    fn test_custom_boost() {
        let boost = Boost {
            factor: 2.0,
            delay: TimeDelta::milliseconds(250),
        };
        let mut latch = BoostLatch::default();
        latch.update(true, true, t(0));
        assert_eq!(latch.output(0.5, t(200), &boost), 0.5);
        assert_eq!(latch.output(0.5, t(250), &boost), 1.0);
    }
}

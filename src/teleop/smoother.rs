//! # Exponential Smoother
//!
//! Blends each new twist with the previous *unsmoothed* twist:
//! `output = alpha * new + (1 - alpha) * previous`, component-wise.
//! The very first twist passes through unchanged.

use super::command::Twist;

/// Default blend weight of the newest sample.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// One-step exponential blend against the previous raw twist.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f64,
    previous: Option<Twist>,
}

impl Default for ExponentialSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl ExponentialSmoother {
    /// Creates a smoother giving weight `alpha` to the newest sample.
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        Self { alpha, previous: None }
    }

    /// Returns the configured blend weight.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the last raw twist seen, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Twist> {
        self.previous
    }

    /// Smooths `raw` and remembers it for the next call.
    ///
    /// # Examples
    ///
    /// ```
    /// use arm_teleop::teleop::command::Twist;
    /// use arm_teleop::teleop::smoother::ExponentialSmoother;
    ///
    /// let mut smoother = ExponentialSmoother::new(0.5);
    /// let mut raw = Twist::default();
    ///
    /// raw.linear.x = 1.0;
    /// assert_eq!(smoother.smooth(raw).linear.x, 1.0);
    ///
    /// raw.linear.x = 3.0;
    /// assert_eq!(smoother.smooth(raw).linear.x, 2.0);
    /// ```
    pub fn smooth(&mut self, raw: Twist) -> Twist {
        let output = match self.previous {
            None => raw,
            Some(previous) => {
                let new = raw.components();
                let old = previous.components();
                let mut blended = [0.0; 6];
                for (i, value) in blended.iter_mut().enumerate() {
                    *value = self.alpha * new[i] + (1.0 - self.alpha) * old[i];
                }
                Twist::from_components(blended)
            }
        };

        self.previous = Some(raw);
        output
    }
}

//! # Initialization Gate
//!
//! Gamepads report 0.0 on every axis until each axis moves for the first
//! time, and some report noise while connecting. Motion output stays
//! suppressed until the operator has touched both triggers at least once;
//! after that the gate stays open for the lifetime of the process.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, warn};

/// One-way gate opened by touching both triggers.
#[derive(Debug, Clone)]
pub struct InitializationGate {
    left_seen: bool,
    right_seen: bool,
    open: bool,
    advisory_interval: TimeDelta,
    last_advisory: Option<DateTime<Utc>>,
    advisories: u64,
}

impl Default for InitializationGate {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(10))
    }
}

impl InitializationGate {
    /// Creates a closed gate that repeats its advisory at most once per
    /// `advisory_interval`.
    #[must_use]
    pub fn new(advisory_interval: TimeDelta) -> Self {
        Self {
            left_seen: false,
            right_seen: false,
            open: false,
            advisory_interval,
            last_advisory: None,
            advisories: 0,
        }
    }

    /// Returns whether the gate has opened.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Number of advisories logged so far.
    #[must_use]
    pub fn advisory_count(&self) -> u64 {
        self.advisories
    }

    /// Observes the two trigger values of one sample and returns whether
    /// the gate is open afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use arm_teleop::teleop::gate::InitializationGate;
    ///
    /// let now = chrono::Utc::now();
    /// let mut gate = InitializationGate::default();
    ///
    /// assert!(!gate.observe(-1.0, 0.0, now));
    /// assert!(gate.observe(0.0, 0.3, now));
    /// assert!(gate.observe(0.0, 0.0, now));
    /// ```
    pub fn observe(&mut self, left_trigger: f64, right_trigger: f64, now: DateTime<Utc>) -> bool {
        if self.open {
            return true;
        }

        if left_trigger != 0.0 {
            self.left_seen = true;
        }
        if right_trigger != 0.0 {
            self.right_seen = true;
        }

        if self.left_seen && self.right_seen {
            self.open = true;
            info!("Both triggers seen, gamepad initialized");
            return true;
        }

        let due = self
            .last_advisory
            .map_or(true, |last| now - last >= self.advisory_interval);
        if due {
            warn!("Press L2 and R2 (both triggers) to initialize the gamepad");
            self.last_advisory = Some(now);
            self.advisories += 1;
        }

        false
    }
}

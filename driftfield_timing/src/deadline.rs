// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot deadlines and re-armable debounce timers.

/// A single point in time that fires exactly once when passed.
///
/// A `Deadline` is either armed (holding a target timestamp) or disarmed.
/// [`Deadline::fire`] returns `true` the first time it is polled with a
/// timestamp at or past the target, and disarms in the same call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Deadline {
    at: Option<f64>,
}

impl Deadline {
    /// Creates a disarmed deadline.
    #[must_use]
    pub const fn new() -> Self {
        Self { at: None }
    }

    /// Arms the deadline at the given timestamp, replacing any pending one.
    pub fn arm(&mut self, at: f64) {
        self.at = Some(at);
    }

    /// Disarms the deadline without firing.
    pub fn cancel(&mut self) {
        self.at = None;
    }

    /// Returns `true` while a target timestamp is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// Returns the pending target timestamp, if any.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.at
    }

    /// Polls the deadline at `now`, firing at most once.
    ///
    /// Returns `true` exactly when the deadline was armed and `now` is at or
    /// past the target; the deadline disarms in that same call.
    pub fn fire(&mut self, now: f64) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// A re-armable deadline with a fixed delay.
///
/// This is the debounce primitive behind hover show/hide: each call to
/// [`DebounceTimer::arm`] schedules the deadline `delay` milliseconds after
/// the given instant, replacing whatever was pending. A cancel or re-arm
/// makes any previously scheduled firing unobservable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceTimer {
    delay: f64,
    deadline: Deadline,
}

impl DebounceTimer {
    /// Creates a disarmed timer with the given delay in milliseconds.
    #[must_use]
    pub const fn new(delay: f64) -> Self {
        Self {
            delay,
            deadline: Deadline::new(),
        }
    }

    /// Returns the configured delay in milliseconds.
    #[must_use]
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Schedules (or reschedules) the timer to fire `delay` after `now`.
    pub fn arm(&mut self, now: f64) {
        self.deadline.arm(now + self.delay);
    }

    /// Cancels any pending firing.
    pub fn cancel(&mut self) {
        self.deadline.cancel();
    }

    /// Returns `true` while a firing is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_armed()
    }

    /// Polls the timer at `now`, firing at most once per arm.
    pub fn fire(&mut self, now: f64) -> bool {
        self.deadline.fire(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_fires_once_at_target() {
        let mut d = Deadline::new();
        d.arm(100.0);
        assert!(d.is_armed());
        assert!(!d.fire(99.9));
        assert!(d.fire(100.0));
        assert!(!d.is_armed());
        assert!(!d.fire(200.0));
    }

    #[test]
    fn deadline_cancel_prevents_firing() {
        let mut d = Deadline::new();
        d.arm(100.0);
        d.cancel();
        assert!(!d.fire(1000.0));
    }

    #[test]
    fn rearm_replaces_pending_target() {
        let mut d = Deadline::new();
        d.arm(100.0);
        d.arm(500.0);
        assert!(!d.fire(200.0));
        assert!(d.fire(500.0));
    }

    #[test]
    fn debounce_rearm_pushes_deadline_out() {
        let mut t = DebounceTimer::new(300.0);
        t.arm(0.0);
        t.arm(200.0);
        // The original 300ms target is gone.
        assert!(!t.fire(350.0));
        assert!(t.fire(500.0));
        assert!(!t.is_pending());
    }

    #[test]
    fn debounce_cancel_is_idempotent() {
        let mut t = DebounceTimer::new(150.0);
        t.cancel();
        t.arm(0.0);
        t.cancel();
        t.cancel();
        assert!(!t.fire(1000.0));
    }
}

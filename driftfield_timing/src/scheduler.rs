// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduling lifecycle.
//!
//! Hosts drive per-frame work (one call per display refresh) through a
//! [`FrameScheduler`]. The trait only models the start/stop lifecycle tied to
//! view visibility; the actual tick callback is whatever the host invokes
//! with the timestamps it obtains. When a scheduler is stopped — the view is
//! hidden, say — no ticks are produced and no state is lost; resuming simply
//! continues from the next timestamp with a fresh delta.

/// Start/stop lifecycle for per-frame ticking.
///
/// Implementations wrap whatever the platform offers for per-refresh
/// callbacks. The contract is intentionally small:
///
/// - after [`start`](Self::start), the host delivers ticks;
/// - after [`stop`](Self::stop), it delivers none;
/// - both are idempotent.
pub trait FrameScheduler {
    /// Begins delivering ticks.
    fn start(&mut self);

    /// Stops delivering ticks. Pending state is retained, not reset.
    fn stop(&mut self);

    /// Returns `true` while ticks are being delivered.
    fn is_running(&self) -> bool;
}

/// A virtual-clock scheduler for tests and headless hosts.
///
/// The owner advances time explicitly with [`ManualScheduler::advance`],
/// which returns the new timestamp only while the scheduler is running —
/// mirroring a platform that stops issuing frame callbacks when the view is
/// hidden.
///
/// ```rust
/// use driftfield_timing::{FrameScheduler, ManualScheduler};
///
/// let mut sched = ManualScheduler::new();
/// assert_eq!(sched.advance(16.0), None); // not started
///
/// sched.start();
/// assert_eq!(sched.advance(16.0), Some(16.0));
/// assert_eq!(sched.advance(16.0), Some(32.0));
///
/// sched.stop();
/// assert_eq!(sched.advance(16.0), None);
///
/// // Time keeps passing while hidden; resuming yields a fresh delta.
/// sched.start();
/// assert_eq!(sched.advance(100.0), Some(148.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualScheduler {
    now: f64,
    running: bool,
}

impl ManualScheduler {
    /// Creates a stopped scheduler at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: 0.0,
            running: false,
        }
    }

    /// Returns the current virtual timestamp in milliseconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advances the virtual clock by `dt` milliseconds.
    ///
    /// The clock always advances; the timestamp is returned (for delivering a
    /// tick) only while running.
    pub fn advance(&mut self, dt: f64) -> Option<f64> {
        self.now += dt;
        self.running.then_some(self.now)
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_stop_are_idempotent() {
        let mut s = ManualScheduler::new();
        s.start();
        s.start();
        assert!(s.is_running());
        s.stop();
        s.stop();
        assert!(!s.is_running());
    }

    #[test]
    fn clock_advances_while_stopped_but_yields_no_ticks() {
        let mut s = ManualScheduler::new();
        assert_eq!(s.advance(50.0), None);
        assert_eq!(s.now(), 50.0);
        s.start();
        assert_eq!(s.advance(10.0), Some(60.0));
    }
}

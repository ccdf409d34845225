// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-period interval timer.

/// A fixed-period tick source.
///
/// While running, [`IntervalTimer::poll`] reports how many whole periods have
/// elapsed since the previous poll and advances its internal phase by that
/// amount. Late polls therefore catch up (a poll after 3.5 periods reports 3
/// ticks), and polling more often than the period reports 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntervalTimer {
    period: f64,
    next: Option<f64>,
}

impl IntervalTimer {
    /// Creates a stopped timer with the given period in milliseconds.
    #[must_use]
    pub const fn new(period: f64) -> Self {
        Self { period, next: None }
    }

    /// Returns the configured period in milliseconds.
    #[must_use]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Starts the timer; the first tick is one period after `now`.
    ///
    /// Starting an already running timer restarts its phase.
    pub fn start(&mut self, now: f64) {
        self.next = Some(now + self.period);
    }

    /// Stops the timer; subsequent polls report no ticks.
    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Returns `true` while the timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Polls at `now`, returning the number of whole periods elapsed since
    /// the last poll and advancing the phase past `now`.
    pub fn poll(&mut self, now: f64) -> u32 {
        let Some(next) = self.next else {
            return 0;
        };
        if now < next || self.period <= 0.0 {
            return 0;
        }
        let elapsed = now - next;
        let ticks = (elapsed / self.period) as u64 + 1;
        self.next = Some(next + ticks as f64 * self.period);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_reports_no_ticks() {
        let mut t = IntervalTimer::new(500.0);
        assert_eq!(t.poll(10_000.0), 0);
    }

    #[test]
    fn ticks_accumulate_at_period_boundaries() {
        let mut t = IntervalTimer::new(500.0);
        t.start(0.0);
        assert_eq!(t.poll(499.0), 0);
        assert_eq!(t.poll(500.0), 1);
        assert_eq!(t.poll(700.0), 0);
        assert_eq!(t.poll(1000.0), 1);
    }

    #[test]
    fn late_poll_catches_up() {
        let mut t = IntervalTimer::new(500.0);
        t.start(0.0);
        assert_eq!(t.poll(1750.0), 3);
        // Phase stays aligned to the original start.
        assert_eq!(t.poll(2000.0), 1);
    }

    #[test]
    fn stop_and_restart_resets_phase() {
        let mut t = IntervalTimer::new(500.0);
        t.start(0.0);
        assert_eq!(t.poll(500.0), 1);
        t.stop();
        assert!(!t.is_running());
        assert_eq!(t.poll(5000.0), 0);
        t.start(5000.0);
        assert_eq!(t.poll(5499.0), 0);
        assert_eq!(t.poll(5500.0), 1);
    }
}

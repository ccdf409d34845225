// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic pipeline progress derived from estimated phase durations.

use alloc::string::String;
use alloc::vec::Vec;

use driftfield_timing::{Deadline, IntervalTimer};

/// Synthetic progress never passes this value; only real completion does.
const SYNTHETIC_CEILING: f64 = 95.0;

/// One named pipeline phase with an estimated duration.
#[derive(Clone, Debug, PartialEq)]
pub struct Phase {
    /// Display name of the phase.
    pub name: String,
    /// Estimated duration in milliseconds.
    pub estimated_ms: f64,
}

impl Phase {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, estimated_ms: f64) -> Self {
        Self {
            name: name.into(),
            estimated_ms,
        }
    }
}

/// Ordered table of pipeline phases.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PhaseTable {
    phases: Vec<Phase>,
}

impl PhaseTable {
    /// Builds a table from phases in pipeline order.
    #[must_use]
    pub fn new(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    /// The placement pipeline's five stages with default estimates.
    ///
    /// Image generation and composition dominate the wall time; the
    /// estimates are deliberately rough, since synthetic progress is capped
    /// below completion anyway.
    #[must_use]
    pub fn placement_default() -> Self {
        Self::new(alloc::vec![
            Phase::new("scene-crafting", 8_000.0),
            Phase::new("image-generation", 30_000.0),
            Phase::new("product-selection", 5_000.0),
            Phase::new("composition", 20_000.0),
            Phase::new("mask-generation", 12_000.0),
        ])
    }

    /// The phases in order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Sum of all estimated durations in milliseconds.
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.phases.iter().map(|p| p.estimated_ms).sum()
    }

    /// Name of the phase in effect after `elapsed_ms`.
    ///
    /// Walks the cumulative duration table and returns the first phase whose
    /// cumulative end has not been passed; past the table's end the last
    /// phase's name is returned. `None` for an empty table.
    #[must_use]
    pub fn phase_name_at(&self, elapsed_ms: f64) -> Option<&str> {
        let mut cumulative = 0.0;
        for phase in &self.phases {
            cumulative += phase.estimated_ms;
            if elapsed_ms < cumulative {
                return Some(&phase.name);
            }
        }
        self.phases.last().map(|p| p.name.as_str())
    }
}

/// Drives synthetic progress for one in-flight batch request.
///
/// While running, [`ProgressTicker::poll`] advances progress on a fixed tick
/// toward a ceiling of 95, proportional to elapsed time over the table's
/// total estimate. Real completion alone sets 100; the value then resets to
/// 0 after a short display delay. If the pipeline finishes faster than the
/// estimates predict, progress jumps discontinuously to 100 — accepted and
/// intentional.
#[derive(Clone, Debug)]
pub struct ProgressTicker {
    table: PhaseTable,
    interval: IntervalTimer,
    started_at: Option<f64>,
    progress: f64,
    reset: Deadline,
    display_delay_ms: f64,
}

impl ProgressTicker {
    /// Creates an idle ticker updating every `tick_ms` (typically 500).
    #[must_use]
    pub fn new(table: PhaseTable, tick_ms: f64, display_delay_ms: f64) -> Self {
        Self {
            table,
            interval: IntervalTimer::new(tick_ms),
            started_at: None,
            progress: 0.0,
            reset: Deadline::new(),
            display_delay_ms,
        }
    }

    /// Current progress in `[0, 100]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Name of the phase currently displayed, while a request is in flight.
    #[must_use]
    pub fn current_phase_name(&self, now: f64) -> Option<&str> {
        let started = self.started_at?;
        self.table.phase_name_at(now - started)
    }

    /// Returns `true` while a request is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Begins synthetic progress for a newly dispatched request.
    pub fn start(&mut self, now: f64) {
        self.started_at = Some(now);
        self.progress = 0.0;
        self.reset.cancel();
        self.interval.start(now);
    }

    /// Advances synthetic progress and handles the post-completion reset.
    pub fn poll(&mut self, now: f64) {
        if let Some(started) = self.started_at
            && self.interval.poll(now) > 0
        {
            let total = self.table.total_ms();
            if total > 0.0 {
                self.progress = ((now - started) / total * 100.0).min(SYNTHETIC_CEILING);
            }
        }
        if self.reset.fire(now) {
            self.progress = 0.0;
        }
    }

    /// Records real completion: progress shows 100, then resets to 0 after
    /// the display delay.
    pub fn complete(&mut self, now: f64) {
        self.started_at = None;
        self.interval.stop();
        self.progress = 100.0;
        self.reset.arm(now + self.display_delay_ms);
    }

    /// Abandons the request (failure or teardown): progress clears
    /// immediately.
    pub fn cancel(&mut self) {
        self.started_at = None;
        self.interval.stop();
        self.reset.cancel();
        self.progress = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PhaseTable {
        PhaseTable::new(alloc::vec![
            Phase::new("first", 1_000.0),
            Phase::new("second", 3_000.0),
            Phase::new("third", 1_000.0),
        ])
    }

    #[test]
    fn phase_walk_follows_cumulative_durations() {
        let t = table();
        assert_eq!(t.total_ms(), 5_000.0);
        assert_eq!(t.phase_name_at(0.0), Some("first"));
        assert_eq!(t.phase_name_at(999.0), Some("first"));
        assert_eq!(t.phase_name_at(1_000.0), Some("second"));
        assert_eq!(t.phase_name_at(3_999.0), Some("second"));
        assert_eq!(t.phase_name_at(4_000.0), Some("third"));
        // Past the table's end the last phase sticks.
        assert_eq!(t.phase_name_at(60_000.0), Some("third"));
        assert_eq!(PhaseTable::default().phase_name_at(0.0), None);
    }

    #[test]
    fn synthetic_progress_never_reaches_one_hundred() {
        let mut ticker = ProgressTicker::new(table(), 500.0, 600.0);
        ticker.start(0.0);
        let mut now = 0.0;
        // Poll far past the total estimate.
        for _ in 0..100 {
            now += 500.0;
            ticker.poll(now);
            assert!(ticker.progress() <= 95.0);
        }
        assert_eq!(ticker.progress(), 95.0);
        assert!(ticker.is_running());
    }

    #[test]
    fn progress_tracks_elapsed_over_total() {
        let mut ticker = ProgressTicker::new(table(), 500.0, 600.0);
        ticker.start(0.0);
        ticker.poll(500.0);
        assert_eq!(ticker.progress(), 10.0);
        ticker.poll(2_500.0);
        assert_eq!(ticker.progress(), 50.0);
    }

    #[test]
    fn between_ticks_progress_holds() {
        let mut ticker = ProgressTicker::new(table(), 500.0, 600.0);
        ticker.start(0.0);
        ticker.poll(500.0);
        let at_tick = ticker.progress();
        ticker.poll(700.0);
        assert_eq!(ticker.progress(), at_tick);
    }

    #[test]
    fn completion_hits_one_hundred_then_resets() {
        let mut ticker = ProgressTicker::new(table(), 500.0, 600.0);
        ticker.start(0.0);
        ticker.poll(1_000.0);
        // The pipeline finished faster than estimated: jump to 100.
        ticker.complete(1_100.0);
        assert_eq!(ticker.progress(), 100.0);
        assert!(!ticker.is_running());
        ticker.poll(1_500.0);
        assert_eq!(ticker.progress(), 100.0);
        ticker.poll(1_700.0);
        assert_eq!(ticker.progress(), 0.0);
    }

    #[test]
    fn phase_name_reflects_elapsed_time() {
        let mut ticker = ProgressTicker::new(table(), 500.0, 600.0);
        assert_eq!(ticker.current_phase_name(0.0), None);
        ticker.start(10_000.0);
        assert_eq!(ticker.current_phase_name(10_100.0), Some("first"));
        assert_eq!(ticker.current_phase_name(12_000.0), Some("second"));
        ticker.cancel();
        assert_eq!(ticker.current_phase_name(12_000.0), None);
    }

    #[test]
    fn cancel_clears_progress_immediately() {
        let mut ticker = ProgressTicker::new(table(), 500.0, 600.0);
        ticker.start(0.0);
        ticker.poll(2_500.0);
        assert!(ticker.progress() > 0.0);
        ticker.cancel();
        assert_eq!(ticker.progress(), 0.0);
        assert!(!ticker.is_running());
    }
}

// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The feed gate: scroll-edge detection, re-entrancy, and overscroll clamping.

/// Whether the feed is accepting scroll-driven growth or waiting on a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateStatus {
    /// No request in flight; scroll triggers are evaluated.
    Open,
    /// A batch request is outstanding; scrolling is clamped and further
    /// triggers are ignored.
    Gated,
}

/// State machine deciding when to request more content and how far the user
/// may scroll while a request is outstanding.
///
/// Invariant: the recorded gate scroll limit is `Some` iff the status is
/// [`GateStatus::Gated`].
///
/// The gate starts not-ready: until [`FeedGate::mark_ready`] latches (the
/// product collaborator has data to generate against), no trigger fires.
#[derive(Clone, Debug, Default)]
pub struct FeedGate {
    gated: bool,
    gate_scroll_limit: Option<f64>,
    ready: bool,
}

impl FeedGate {
    /// Creates an open, not-yet-ready gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latches the one-time readiness condition.
    ///
    /// Before this, the gate never closes: there is nothing to generate
    /// against yet.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Returns `true` once readiness has latched.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> GateStatus {
        debug_assert_eq!(
            self.gated,
            self.gate_scroll_limit.is_some(),
            "gate limit must be recorded iff gated"
        );
        if self.gated {
            GateStatus::Gated
        } else {
            GateStatus::Open
        }
    }

    /// Scroll offset recorded at the moment gating began, while gated.
    #[must_use]
    pub fn gate_scroll_limit(&self) -> Option<f64> {
        self.gate_scroll_limit
    }

    /// Evaluates the trigger condition after a scroll or extent change.
    ///
    /// Returns `true` exactly when a batch request must be dispatched: the
    /// visible bottom is within one viewport of the end of laid-out content,
    /// the feed is ready, and no request is already in flight. Re-entrant
    /// triggers while gated return `false`.
    pub fn on_scroll_changed(
        &mut self,
        scroll_offset: f64,
        viewport_extent: f64,
        content_extent: f64,
    ) -> bool {
        if !self.ready || self.gated {
            return false;
        }
        if scroll_offset + viewport_extent <= content_extent - viewport_extent {
            return false;
        }
        self.close_at(scroll_offset);
        true
    }

    /// Closes the gate at the given scroll offset without a scroll trigger.
    ///
    /// Used by retry: after a failed request released the gate, the host
    /// re-dispatches immediately. Returns `false` if already gated.
    pub fn regate(&mut self, scroll_offset: f64) -> bool {
        if self.gated {
            return false;
        }
        self.close_at(scroll_offset);
        true
    }

    /// Clamps a requested scroll offset.
    ///
    /// While gated, the ceiling is the gating offset plus one viewport of
    /// soft overscroll; while open, the request passes through.
    #[must_use]
    pub fn clamp_scroll(&self, requested: f64, viewport_extent: f64) -> f64 {
        match self.gate_scroll_limit {
            Some(limit) => requested.min(limit + viewport_extent),
            None => requested,
        }
    }

    /// Reopens the gate (batch merged, or request failed).
    pub fn release(&mut self) {
        #[cfg(feature = "tracing")]
        if self.gated {
            tracing::debug!("feed gate released");
        }
        self.gated = false;
        self.gate_scroll_limit = None;
    }

    fn close_at(&mut self, scroll_offset: f64) {
        #[cfg(feature = "tracing")]
        tracing::debug!(scroll_offset, "feed gate closed, dispatching batch");
        self.gated = true;
        self.gate_scroll_limit = Some(scroll_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_gate_never_triggers() {
        let mut gate = FeedGate::new();
        assert!(!gate.on_scroll_changed(2_400.0, 800.0, 2_500.0));
        assert_eq!(gate.status(), GateStatus::Open);
    }

    #[test]
    fn trigger_requires_bottom_within_one_viewport() {
        let mut gate = FeedGate::new();
        gate.mark_ready();
        // Visible bottom 1500, threshold 2500 - 800 = 1700: not yet.
        assert!(!gate.on_scroll_changed(700.0, 800.0, 2_500.0));
        // Visible bottom 1701 > 1700: trigger.
        assert!(gate.on_scroll_changed(901.0, 800.0, 2_500.0));
        assert_eq!(gate.gate_scroll_limit(), Some(901.0));
    }

    #[test]
    fn retrigger_while_gated_dispatches_nothing() {
        let mut gate = FeedGate::new();
        gate.mark_ready();
        assert!(gate.on_scroll_changed(1_800.0, 800.0, 2_500.0));
        assert!(!gate.on_scroll_changed(1_900.0, 800.0, 2_500.0));
        assert!(!gate.on_scroll_changed(2_400.0, 800.0, 2_500.0));
    }

    #[test]
    fn clamp_allows_one_viewport_of_overscroll() {
        let mut gate = FeedGate::new();
        gate.mark_ready();
        assert!(gate.on_scroll_changed(1_800.0, 800.0, 2_500.0));
        assert_eq!(gate.clamp_scroll(2_000.0, 800.0), 2_000.0);
        assert_eq!(gate.clamp_scroll(2_600.0, 800.0), 2_600.0);
        assert_eq!(gate.clamp_scroll(2_601.0, 800.0), 2_600.0);
        assert_eq!(gate.clamp_scroll(99_999.0, 800.0), 2_600.0);
    }

    #[test]
    fn open_gate_does_not_clamp() {
        let gate = FeedGate::new();
        assert_eq!(gate.clamp_scroll(123_456.0, 800.0), 123_456.0);
    }

    #[test]
    fn release_reopens_and_clears_limit() {
        let mut gate = FeedGate::new();
        gate.mark_ready();
        assert!(gate.on_scroll_changed(1_800.0, 800.0, 2_500.0));
        gate.release();
        assert_eq!(gate.status(), GateStatus::Open);
        assert_eq!(gate.gate_scroll_limit(), None);
        // A fresh trigger can fire again.
        assert!(gate.on_scroll_changed(1_800.0, 800.0, 2_500.0));
    }

    #[test]
    fn regate_supports_retry_without_scroll_trigger() {
        let mut gate = FeedGate::new();
        gate.mark_ready();
        assert!(gate.regate(1_500.0));
        assert_eq!(gate.status(), GateStatus::Gated);
        assert!(!gate.regate(1_500.0));
        assert_eq!(gate.clamp_scroll(9_000.0, 800.0), 2_300.0);
    }
}

// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hover controller and its transitions.

use driftfield_timing::DebounceTimer;
use kurbo::Rect;
use smallvec::SmallVec;

/// Timing configuration for hover show/hide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverConfig {
    /// Delay before a hovered active region surfaces its overlay, in
    /// milliseconds. Typical values are 300–800 depending on context.
    pub show_delay_ms: f64,
    /// Grace delay before a left overlay hides, in milliseconds. Long enough
    /// to travel from the image onto the overlay surface.
    pub hide_delay_ms: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 500.0,
            hide_delay_ms: 180.0,
        }
    }
}

/// Effects produced by hover transitions, for the host to apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HoverEffect<Id> {
    /// Surface the overlay for this element at these screen bounds.
    Show {
        /// Element whose active region was hovered.
        id: Id,
        /// Tight screen bounds of the active region at show time.
        bounds: Rect,
    },
    /// Clear the overlay currently shown for this element.
    Hide {
        /// Element whose overlay is being cleared.
        id: Id,
    },
}

/// Effect list returned by transitions; at most a hide plus a show.
pub type Effects<Id> = SmallVec<[HoverEffect<Id>; 2]>;

/// Named phases of the hover machine, for inspection and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverPhase<'a, Id> {
    /// No overlay and no pending show.
    Idle,
    /// A show timer is running for this element.
    PendingShow(&'a Id),
    /// An overlay is visible for this element.
    Shown(&'a Id),
    /// An overlay is visible but its hide timer is running.
    PendingHide(&'a Id),
}

#[derive(Clone, Debug)]
struct Overlay<Id> {
    id: Id,
    locked: bool,
    over_overlay: bool,
}

/// Layers debounced show/hide timing over per-element mask queries to drive
/// a single active overlay.
///
/// `Id` is the host's element identifier. Overlay bounds are resolved by the
/// caller at fire time (elements drift, so bounds are computed against the
/// element's current screen rect).
#[derive(Clone, Debug)]
pub struct HoverController<Id> {
    config: HoverConfig,
    overlay: Option<Overlay<Id>>,
    pending: Option<Id>,
    show: DebounceTimer,
    hide: DebounceTimer,
}

impl<Id: Clone + PartialEq> HoverController<Id> {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(config: HoverConfig) -> Self {
        Self {
            config,
            overlay: None,
            pending: None,
            show: DebounceTimer::new(config.show_delay_ms),
            hide: DebounceTimer::new(config.hide_delay_ms),
        }
    }

    /// Returns the timing configuration.
    #[must_use]
    pub fn config(&self) -> HoverConfig {
        self.config
    }

    /// Current phase of the machine.
    ///
    /// While an overlay is shown, a pending show for another element (an
    /// upcoming switch) is not reported here; see
    /// [`HoverController::pending_id`].
    #[must_use]
    pub fn phase(&self) -> HoverPhase<'_, Id> {
        if let Some(overlay) = &self.overlay {
            if self.hide.is_pending() {
                HoverPhase::PendingHide(&overlay.id)
            } else {
                HoverPhase::Shown(&overlay.id)
            }
        } else if let Some(pending) = &self.pending {
            HoverPhase::PendingShow(pending)
        } else {
            HoverPhase::Idle
        }
    }

    /// Element whose overlay is currently shown, if any.
    #[must_use]
    pub fn shown_id(&self) -> Option<&Id> {
        self.overlay.as_ref().map(|o| &o.id)
    }

    /// Element with a pending show timer, if any.
    #[must_use]
    pub fn pending_id(&self) -> Option<&Id> {
        self.pending.as_ref()
    }

    /// Returns `true` while the shown overlay is click-locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.overlay.as_ref().is_some_and(|o| o.locked)
    }

    /// Pointer moved over an element's active region.
    ///
    /// Arms the show timer unless that element's overlay is already shown
    /// (which instead cancels any pending hide) or a different element's
    /// overlay is being interacted with.
    pub fn pointer_over_active(&mut self, id: Id, now: f64) {
        if let Some(overlay) = &self.overlay {
            if overlay.id == id {
                // Back over the shown element: keep its overlay up.
                self.hide.cancel();
                self.clear_pending();
                return;
            }
            if overlay.locked || overlay.over_overlay {
                return;
            }
        }
        if self.pending.as_ref() != Some(&id) {
            self.pending = Some(id);
            self.show.arm(now);
        }
    }

    /// Pointer moved off the active region (or onto a maskless part of the
    /// element).
    pub fn pointer_over_inactive(&mut self, now: f64) {
        self.clear_pending();
        if let Some(overlay) = &self.overlay
            && !overlay.locked
            && !overlay.over_overlay
            && !self.hide.is_pending()
        {
            self.hide.arm(now);
        }
    }

    /// Pointer left the element entirely. Same consequences as moving off
    /// the active region.
    pub fn pointer_left(&mut self, now: f64) {
        self.pointer_over_inactive(now);
    }

    /// Pointer reached the overlay surface itself; a pending hide is
    /// canceled so image-to-popup travel does not flicker.
    pub fn overlay_enter(&mut self) {
        if let Some(overlay) = &mut self.overlay {
            overlay.over_overlay = true;
            self.hide.cancel();
        }
    }

    /// Pointer left the overlay surface.
    pub fn overlay_leave(&mut self, now: f64) {
        if let Some(overlay) = &mut self.overlay {
            overlay.over_overlay = false;
            if !overlay.locked {
                self.hide.arm(now);
            }
        }
    }

    /// Click on an element's active region.
    ///
    /// If that element's overlay is shown, toggles its click-lock. Otherwise
    /// the overlay is surfaced immediately (no show delay) in the locked
    /// state, bounds permitting.
    pub fn click_active(
        &mut self,
        id: Id,
        mut resolve: impl FnMut(&Id) -> Option<Rect>,
    ) -> Effects<Id> {
        let mut effects = Effects::new();
        if let Some(overlay) = &mut self.overlay {
            if overlay.id == id {
                overlay.locked = !overlay.locked;
                if overlay.locked {
                    self.hide.cancel();
                }
                return effects;
            }
        }
        self.clear_pending();
        if let Some(bounds) = resolve(&id) {
            if let Some(old) = self.overlay.take() {
                effects.push(HoverEffect::Hide { id: old.id });
            }
            self.hide.cancel();
            self.overlay = Some(Overlay {
                id: id.clone(),
                locked: true,
                over_overlay: false,
            });
            effects.push(HoverEffect::Show { id, bounds });
        }
        effects
    }

    /// Click outside the element and overlay: clears everything, including a
    /// click-lock.
    pub fn outside_click(&mut self) -> Effects<Id> {
        self.dismiss()
    }

    /// Explicit close action on the overlay.
    pub fn close(&mut self) -> Effects<Id> {
        self.dismiss()
    }

    /// Fires due timers.
    ///
    /// `resolve` maps an element id to the current screen bounds of its
    /// active region; `None` (no mask, or nothing active under the crop)
    /// silently cancels the show.
    pub fn advance(
        &mut self,
        now: f64,
        mut resolve: impl FnMut(&Id) -> Option<Rect>,
    ) -> Effects<Id> {
        let mut effects = Effects::new();

        if self.show.fire(now)
            && let Some(id) = self.pending.take()
        {
            if let Some(bounds) = resolve(&id) {
                if let Some(old) = self.overlay.take() {
                    effects.push(HoverEffect::Hide { id: old.id });
                }
                self.hide.cancel();
                self.overlay = Some(Overlay {
                    id: id.clone(),
                    locked: false,
                    over_overlay: false,
                });
                effects.push(HoverEffect::Show { id, bounds });
            }
        }

        if self.hide.fire(now)
            && let Some(overlay) = self.overlay.take()
        {
            if overlay.locked {
                // Lock applied after the timer was armed; keep the overlay.
                self.overlay = Some(overlay);
            } else {
                effects.push(HoverEffect::Hide { id: overlay.id });
            }
        }

        effects
    }

    fn dismiss(&mut self) -> Effects<Id> {
        let mut effects = Effects::new();
        self.clear_pending();
        self.hide.cancel();
        if let Some(overlay) = self.overlay.take() {
            effects.push(HoverEffect::Hide { id: overlay.id });
        }
        effects
    }

    fn clear_pending(&mut self) {
        self.pending = None;
        self.show.cancel();
    }
}

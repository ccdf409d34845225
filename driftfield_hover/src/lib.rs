// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driftfield Hover: the debounced hover-overlay state machine.
//!
//! Hovering an element's active (mask-hit) region should eventually surface a
//! single product overlay — but only after the pointer has lingered, only one
//! overlay at a time, and with enough grace on leave that the pointer can
//! travel from the image onto the overlay itself without flicker. This crate
//! expresses those rules as one explicit state machine:
//!
//! ```text
//! Idle -> PendingShow -> Shown -> PendingHide -> Idle
//! ```
//!
//! driven by pointer events plus an [`advance`](HoverController::advance)
//! call per frame. Transitions return [`HoverEffect`]s (`Show`/`Hide`) for
//! the host to act on; nothing is delivered through callbacks, so
//! cancellation correctness is checkable with a virtual clock.
//!
//! The rules, from most to least obvious:
//!
//! - entering an active region arms a show timer; leaving before it fires
//!   cancels it;
//! - when the timer fires, the overlay bounds are resolved by the caller
//!   (pixel-accurate `active_bounds`); a `None` resolution — a degenerate
//!   mask — shows nothing and is not an error;
//! - leaving a shown overlay's element arms a short hide timer, canceled if
//!   the pointer reaches the overlay surface;
//! - clicking the active region toggles a *click-lock* that suppresses
//!   leave-based hiding until an explicit close or a click outside;
//! - while an overlay is locked or the pointer is on it, hovering a
//!   *different* element's active region does not arm a new show timer.
//!
//! ## Minimal example
//!
//! ```rust
//! use driftfield_hover::{HoverConfig, HoverController, HoverEffect};
//! use kurbo::Rect;
//!
//! let bounds = Rect::new(10.0, 10.0, 60.0, 40.0);
//! let mut hover = HoverController::new(HoverConfig::default());
//!
//! hover.pointer_over_active(7u32, 0.0);
//! assert!(hover.advance(100.0, |_| Some(bounds)).is_empty());
//!
//! let effects = hover.advance(600.0, |_| Some(bounds));
//! assert_eq!(effects.as_slice(), &[HoverEffect::Show { id: 7, bounds }]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;

pub use controller::{Effects, HoverConfig, HoverController, HoverEffect, HoverPhase};

// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driftfield Feed: scroll-gated, on-demand content growth.
//!
//! A drift field grows by asking an external multi-phase pipeline for a new
//! batch whenever the user nears the end of laid-out content. Three pieces
//! cooperate:
//!
//! - [`FeedGate`]: a small state machine over scroll position and content
//!   extent. When the visible bottom comes within one viewport of the end
//!   (and the feed is ready, and no request is in flight), the gate closes,
//!   records the scroll offset at gating time, and reports that exactly one
//!   batch request should be dispatched. While gated, scrolling is clamped
//!   to one viewport past the recorded offset — a bounded soft overscroll
//!   instead of a hard wall.
//! - [`ProgressTicker`] over a [`PhaseTable`]: while a request is in flight,
//!   synthetic progress derived from estimated phase durations advances on a
//!   fixed tick toward a ceiling of 95. Only real completion reaches 100;
//!   after a short display delay it resets to 0. The current phase name is
//!   found by walking the cumulative duration table.
//! - [`ContentMerger`]: folds a finished batch into the live list —
//!   idempotently by id, placing survivors in a randomized lane with a
//!   randomized aspect-respecting size below both the existing content and
//!   the extent's margin band, and extending the extent with a safety
//!   margin (a merge with survivors always grows the extent).
//!
//! The gate's `Gated` status is the sole re-entrancy guard for the single
//! in-flight request; there is no separate lock. A failed request releases
//! the gate so the user is never stuck, and a retry re-gates without waiting
//! for a fresh scroll trigger.
//!
//! ## Gate lifecycle
//!
//! ```rust
//! use driftfield_feed::{FeedGate, GateStatus};
//!
//! let mut gate = FeedGate::new();
//! gate.mark_ready();
//!
//! // Scrolled to within one viewport of the end: request exactly once.
//! assert!(gate.on_scroll_changed(1600.0, 800.0, 2500.0));
//! assert!(!gate.on_scroll_changed(1700.0, 800.0, 2500.0));
//! assert_eq!(gate.status(), GateStatus::Gated);
//!
//! // Soft overscroll: at most one viewport past the gating offset.
//! assert_eq!(gate.clamp_scroll(9_999.0, 800.0), 2400.0);
//!
//! // The merged batch releases the gate.
//! gate.release();
//! assert_eq!(gate.status(), GateStatus::Open);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod gate;
mod merge;
mod progress;

pub use error::FeedError;
pub use gate::{FeedGate, GateStatus};
pub use merge::{ContentMerger, MergeCandidate, MergeOutcome, PlacedItem, PlacementParams};
pub use progress::{Phase, PhaseTable, ProgressTicker};

// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driftfield Timing: host-driven timers and frame scheduling.
//!
//! Every timed behavior in Driftfield — hover show/hide debounce, synthetic
//! progress ticks, the per-frame simulation — is advanced by the host passing
//! an explicit timestamp. Nothing in this crate reads a clock or spawns a
//! thread; time is a plain `f64` millisecond value chosen by the caller. This
//! makes every consumer testable by advancing a virtual clock.
//!
//! The building blocks are:
//!
//! - [`Deadline`]: a single point in time that fires exactly once when passed.
//! - [`DebounceTimer`]: a re-armable deadline with a fixed delay. Re-arming
//!   replaces the pending deadline, which is what makes stale callbacks
//!   impossible: a newer event simply overwrites the older schedule.
//! - [`IntervalTimer`]: a fixed-period tick source that reports how many
//!   whole periods elapsed since the last poll.
//! - [`FrameScheduler`]: a start/stop lifecycle for per-frame callbacks, with
//!   [`ManualScheduler`] as the virtual-clock implementation used in tests.
//!
//! ## Minimal example
//!
//! ```rust
//! use driftfield_timing::DebounceTimer;
//!
//! let mut show = DebounceTimer::new(300.0);
//!
//! // Pointer enters an active region at t=1000ms.
//! show.arm(1000.0);
//! assert!(!show.fire(1200.0)); // not yet
//!
//! // Pointer moves again at t=1250ms; the pending deadline is replaced.
//! show.arm(1250.0);
//! assert!(!show.fire(1400.0)); // old deadline no longer exists
//! assert!(show.fire(1550.0)); // fires once
//! assert!(!show.fire(1600.0)); // and only once
//! ```
//!
//! Timestamps are expected to be finite and non-decreasing within one timer's
//! lifetime; behavior under time going backwards is unspecified.
//!
//! This crate is `no_std` and has no dependencies.

#![no_std]

extern crate alloc;

mod deadline;
mod interval;
mod scheduler;

pub use deadline::{Deadline, DebounceTimer};
pub use interval::IntervalTimer;
pub use scheduler::{FrameScheduler, ManualScheduler};

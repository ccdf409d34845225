// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driftfield Motion: kinematic bodies and the per-frame drift simulation.
//!
//! Every animated card in a drift field is driven by one [`MotionBody`]: a
//! position in container coordinates, a velocity, an opacity, and a scale,
//! advanced once per display refresh by the [`Simulator`]. The per-tick step
//! applies, in order:
//!
//! 1. age-based opacity (linear fade-in, then linear fade-out over the
//!    element's configured lifetime),
//! 2. drift (`position += velocity * drift_speed`),
//! 3. damping (a constant factor below 1, keeping long-run energy bounded),
//! 4. a jiggle impulse (uniform random, boosted right after spawn and
//!    decaying to the baseline over the first ~2 seconds),
//! 5. boundary reflection against a configured rectangle, with the velocity
//!    component forced away from the wall that was hit.
//!
//! Bodies whose opacity has decayed below a small epsilon are removed on the
//! same tick unless pinned. Pinned bodies hold opacity 1 and velocity 0.
//!
//! ## Drag override
//!
//! Direct manipulation must not fight the simulation. While a body is
//! dragged, the simulator does not touch it at all: the host writes positions
//! straight through [`Simulator::drag_to`]. On release, a velocity is
//! computed from the pointer's motion over a short trailing window and handed
//! back to the simulation, so the element keeps moving the way the hand was
//! moving instead of teleporting back into the physics.
//!
//! ```rust
//! use driftfield_motion::{MotionParams, Simulator};
//! use kurbo::Point;
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let mut sim = Simulator::new(MotionParams::default());
//!
//! let id = sim.spawn(Point::new(50.0, 400.0), 0.0);
//! sim.tick(16.0, &mut rng);
//!
//! // The user grabs the card and moves it.
//! sim.begin_drag(id, 16.0);
//! sim.drag_to(id, Point::new(60.0, 380.0), 48.0);
//! sim.drag_to(id, Point::new(70.0, 360.0), 80.0);
//! let release = sim.end_drag(id, 80.0).unwrap();
//! assert!(release.x > 0.0 && release.y < 0.0);
//!
//! // Position at release is exactly the last dragged position.
//! assert_eq!(sim.body(id).unwrap().position, Point::new(70.0, 360.0));
//! ```
//!
//! The tick is pure and total: it has no failure modes. If the host's frame
//! scheduler stops (the view is hidden), the world simply pauses; resuming
//! picks up from the last state with a fresh timestamp delta.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod body;
mod simulator;

pub use body::{BodyId, MotionBody, MotionParams};
pub use simulator::Simulator;

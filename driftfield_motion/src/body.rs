// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-body kinematic state and its single-step integration.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};
use rand::Rng;

/// Velocity damping applied every tick.
///
/// Held constant rather than configured: values outside a narrow band either
/// freeze the field or let jiggle energy accumulate without bound.
const DAMPING: f64 = 0.998;

/// Identifier for a motion body.
///
/// Stable for the body's lifetime; never reused within one [`Simulator`]
/// (ids are allocated from a monotone counter).
///
/// [`Simulator`]: crate::Simulator
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BodyId(pub(crate) u64);

impl BodyId {
    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Tuning for the drift simulation.
///
/// Positions are in container units: by convention x in percent of the
/// container width and y in content coordinates, but the simulation itself is
/// unit-agnostic — `bounds` just has to be expressed in the same space as
/// the positions.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionParams {
    /// Duration of the linear fade-in, in milliseconds.
    pub fade_in_ms: f64,
    /// Per-element lifetime: duration of the linear fade-out that follows the
    /// fade-in, in milliseconds.
    pub fade_out_ms: f64,
    /// Scalar applied to velocity when integrating position, shared by all
    /// bodies.
    pub drift_speed: f64,
    /// Scale of the per-tick random velocity impulse.
    pub jiggle_intensity: f64,
    /// Jiggle multiplier immediately after spawn (decays linearly to 1).
    pub spawn_jiggle_boost: f64,
    /// Time over which the spawn boost decays to 1, in milliseconds.
    pub spawn_jiggle_decay_ms: f64,
    /// Rectangle bodies are confined to, in container units.
    pub bounds: Rect,
    /// Velocity retained on boundary reflection, in `[0, 1]`.
    pub bounce: f64,
    /// Opacity below which an unpinned body is removed.
    pub removal_epsilon: f64,
    /// Scale applied to a body while it is dragged.
    pub lifted_scale: f64,
    /// Trailing window over which release velocity is measured, in
    /// milliseconds.
    pub release_window_ms: f64,
    /// Scalar converting pointer motion (units per millisecond) into a
    /// release velocity.
    pub release_velocity_scale: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            fade_in_ms: 1_000.0,
            fade_out_ms: 45_000.0,
            drift_speed: 1.0,
            jiggle_intensity: 0.02,
            spawn_jiggle_boost: 3.0,
            spawn_jiggle_decay_ms: 2_000.0,
            bounds: Rect::new(0.0, 0.0, 100.0, 2_000.0),
            bounce: 0.7,
            removal_epsilon: 0.01,
            lifted_scale: 1.05,
            release_window_ms: 100.0,
            release_velocity_scale: 16.0,
        }
    }
}

impl MotionParams {
    /// Jiggle multiplier for a body of the given age.
    ///
    /// Starts at `spawn_jiggle_boost` and decays linearly to 1 over
    /// `spawn_jiggle_decay_ms`.
    #[must_use]
    pub fn jiggle_boost(&self, age_ms: f64) -> f64 {
        if self.spawn_jiggle_decay_ms <= 0.0 || age_ms >= self.spawn_jiggle_decay_ms {
            return 1.0;
        }
        let t = (age_ms / self.spawn_jiggle_decay_ms).clamp(0.0, 1.0);
        self.spawn_jiggle_boost + (1.0 - self.spawn_jiggle_boost) * t
    }

    /// Opacity for a body of the given age: linear fade-in, then linear
    /// fade-out, clamped to `[0, 1]`.
    #[must_use]
    pub fn opacity_at(&self, age_ms: f64) -> f64 {
        if age_ms < 0.0 {
            return 0.0;
        }
        if self.fade_in_ms > 0.0 && age_ms < self.fade_in_ms {
            return age_ms / self.fade_in_ms;
        }
        if self.fade_out_ms <= 0.0 {
            return 0.0;
        }
        (1.0 - (age_ms - self.fade_in_ms) / self.fade_out_ms).clamp(0.0, 1.0)
    }
}

/// Kinematic state for one animated element.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionBody {
    /// Stable identifier for this body.
    pub id: BodyId,
    /// Position in container units.
    pub position: Point,
    /// Velocity in container units per tick.
    pub velocity: Vec2,
    /// Current opacity in `[0, 1]`.
    pub opacity: f64,
    /// Current render scale.
    pub scale: f64,
    /// Timestamp the body was created at, in milliseconds.
    pub spawn_time: f64,
    /// Pinned bodies hold opacity 1 and velocity 0 and are never removed by
    /// age.
    pub pinned: bool,
    /// While set, the simulator must not mutate position or velocity; the
    /// host writes them directly.
    pub dragged_by_user: bool,
}

impl MotionBody {
    /// Age of the body at `now`, in milliseconds.
    #[must_use]
    pub fn age(&self, now: f64) -> f64 {
        now - self.spawn_time
    }

    /// Advances this body by one tick.
    ///
    /// Dragged bodies are left untouched; pinned bodies only have opacity and
    /// velocity held. The caller removes faded bodies afterwards.
    pub fn step(&mut self, now: f64, params: &MotionParams, rng: &mut impl Rng) {
        if self.dragged_by_user {
            return;
        }
        if self.pinned {
            self.opacity = 1.0;
            self.velocity = Vec2::ZERO;
            return;
        }

        self.opacity = params.opacity_at(self.age(now));

        self.position += self.velocity * params.drift_speed;
        self.velocity *= DAMPING;

        let boost = params.jiggle_boost(self.age(now)) * params.jiggle_intensity;
        self.velocity += Vec2::new(
            rng.random_range(-1.0..=1.0) * boost,
            rng.random_range(-1.0..=1.0) * boost,
        );

        self.reflect_into(&params.bounds, params.bounce);
    }

    /// Clamps the position into `bounds`, reflecting velocity off any wall
    /// that was hit.
    ///
    /// The reflected component's sign is forced away from the wall so a body
    /// cannot stick to a boundary across consecutive ticks.
    fn reflect_into(&mut self, bounds: &Rect, bounce: f64) {
        if self.position.x < bounds.x0 {
            self.position.x = bounds.x0;
            self.velocity.x = self.velocity.x.abs() * bounce;
        } else if self.position.x > bounds.x1 {
            self.position.x = bounds.x1;
            self.velocity.x = -self.velocity.x.abs() * bounce;
        }
        if self.position.y < bounds.y0 {
            self.position.y = bounds.y0;
            self.velocity.y = self.velocity.y.abs() * bounce;
        } else if self.position.y > bounds.y1 {
            self.position.y = bounds.y1;
            self.velocity.y = -self.velocity.y.abs() * bounce;
        }
    }
}

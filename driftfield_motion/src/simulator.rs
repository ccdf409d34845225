// Copyright 2026 the Driftfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live body set and its per-frame update.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};
use rand::Rng;
use smallvec::SmallVec;

use crate::body::{BodyId, MotionBody, MotionParams};

/// Timestamped pointer sample recorded while dragging.
type DragSample = (f64, Point);

/// Pointer history for the body currently being dragged.
#[derive(Clone, Debug)]
struct DragTrack {
    id: BodyId,
    samples: SmallVec<[DragSample; 8]>,
}

/// Owns the live set of [`MotionBody`] records and advances them each frame.
///
/// Bodies are stored in insertion order; iteration order is stable across
/// ticks except for removals. At most one body is dragged at a time (there is
/// one pointer), and while it is, [`Simulator::tick`] does not mutate it.
#[derive(Clone, Debug)]
pub struct Simulator {
    params: MotionParams,
    bodies: Vec<MotionBody>,
    next_id: u64,
    drag: Option<DragTrack>,
}

impl Simulator {
    /// Creates an empty simulator with the given tuning.
    #[must_use]
    pub fn new(params: MotionParams) -> Self {
        Self {
            params,
            bodies: Vec::new(),
            next_id: 1,
            drag: None,
        }
    }

    /// Returns the current tuning.
    #[must_use]
    pub fn params(&self) -> &MotionParams {
        &self.params
    }

    /// Replaces the confinement rectangle.
    ///
    /// Used when the content extent grows: existing bodies keep their state
    /// and are reflected against the new bounds on the next tick.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.params.bounds = bounds;
    }

    /// Creates a new body at the given position, fading in from zero.
    pub fn spawn(&mut self, position: Point, now: f64) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(MotionBody {
            id,
            position,
            velocity: Vec2::ZERO,
            opacity: 0.0,
            scale: 1.0,
            spawn_time: now,
            pinned: false,
            dragged_by_user: false,
        });
        id
    }

    /// Returns the body with the given id, if it is still live.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&MotionBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Iterates the live bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = &MotionBody> {
        self.bodies.iter()
    }

    /// Number of live bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns `true` when no bodies are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Removes a body immediately, together with any drag tracking for it.
    pub fn remove(&mut self, id: BodyId) {
        self.bodies.retain(|b| b.id != id);
        if self.drag.as_ref().is_some_and(|d| d.id == id) {
            self.drag = None;
        }
    }

    /// Pins or unpins a body.
    ///
    /// While pinned, opacity is held at 1, velocity at 0, and the body is
    /// exempt from age-based removal.
    pub fn set_pinned(&mut self, id: BodyId, pinned: bool) {
        if let Some(body) = self.body_mut(id) {
            body.pinned = pinned;
        }
    }

    /// Advances every eligible body by one tick and removes faded ones.
    ///
    /// Dragged bodies are untouched; pinned bodies hold opacity and velocity.
    /// A body past its fade-in whose opacity has decayed to at most
    /// `removal_epsilon` is removed on this same tick unless pinned or
    /// dragged. Bodies still fading in are low-opacity but never removed, so
    /// a tick landing right after a spawn cannot delete the newcomer.
    pub fn tick(&mut self, now: f64, rng: &mut impl Rng) {
        for body in &mut self.bodies {
            body.step(now, &self.params, rng);
        }
        let epsilon = self.params.removal_epsilon;
        let fade_in = self.params.fade_in_ms;
        self.bodies.retain(|b| {
            b.pinned || b.dragged_by_user || b.age(now) <= fade_in || b.opacity > epsilon
        });
    }

    /// Begins a drag on a body.
    ///
    /// Sets the dragged flag, lifts the body (opacity 1, lifted scale), zeros
    /// its velocity, and starts recording pointer samples for the release
    /// velocity. Returns `false` if the body does not exist; any previous
    /// drag is released back to the simulation first.
    pub fn begin_drag(&mut self, id: BodyId, now: f64) -> bool {
        if let Some(prev) = self.drag.take()
            && let Some(body) = self.body_mut(prev.id)
        {
            body.dragged_by_user = false;
            body.scale = 1.0;
        }
        let lifted = self.params.lifted_scale;
        let Some(body) = self.body_mut(id) else {
            return false;
        };
        body.dragged_by_user = true;
        body.opacity = 1.0;
        body.scale = lifted;
        body.velocity = Vec2::ZERO;
        let position = body.position;
        let mut samples = SmallVec::new();
        samples.push((now, position));
        self.drag = Some(DragTrack { id, samples });
        true
    }

    /// Writes a dragged body's position directly.
    ///
    /// Velocity stays zero while dragging. Samples older than the release
    /// window are discarded as new ones arrive.
    pub fn drag_to(&mut self, id: BodyId, position: Point, now: f64) {
        let window = self.params.release_window_ms;
        let Some(track) = self.drag.as_mut().filter(|d| d.id == id) else {
            return;
        };
        track.samples.push((now, position));
        let cutoff = now - window;
        while track.samples.len() > 1 && track.samples[0].0 < cutoff {
            track.samples.remove(0);
        }
        if let Some(body) = self.bodies.iter_mut().find(|b| b.id == id) {
            body.position = position;
            body.velocity = Vec2::ZERO;
        }
    }

    /// Ends a drag, handing the body back to the simulation.
    ///
    /// The release velocity is proportional to the pointer's motion over the
    /// trailing sample window; the position is left exactly where the last
    /// [`Simulator::drag_to`] put it. Returns the release velocity, or `None`
    /// if no drag was active for this body.
    pub fn end_drag(&mut self, id: BodyId, now: f64) -> Option<Vec2> {
        if !self.drag.as_ref().is_some_and(|d| d.id == id) {
            return None;
        }
        let track = self.drag.take()?;
        let velocity = release_velocity(
            &track.samples,
            now - self.params.release_window_ms,
            self.params.release_velocity_scale,
        );
        let body = self.body_mut(id)?;
        body.dragged_by_user = false;
        body.scale = 1.0;
        body.velocity = velocity;
        Some(velocity)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut MotionBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }
}

/// Computes the release velocity from pointer samples inside the window.
fn release_velocity(samples: &[DragSample], cutoff: f64, scale: f64) -> Vec2 {
    let recent: SmallVec<[&DragSample; 8]> =
        samples.iter().filter(|(t, _)| *t >= cutoff).collect();
    let (Some((t0, p0)), Some((t1, p1))) = (recent.first(), recent.last()) else {
        return Vec2::ZERO;
    };
    let dt = t1 - t0;
    if dt <= 0.0 {
        return Vec2::ZERO;
    }
    (*p1 - *p0) * (scale / dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sim() -> Simulator {
        Simulator::new(MotionParams {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            ..MotionParams::default()
        })
    }

    #[test]
    fn bodies_stay_inside_bounds_over_many_ticks() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut sim = sim();
        for i in 0..10 {
            sim.spawn(Point::new(f64::from(i) * 10.0, 50.0), 0.0);
        }
        let bounds = sim.params().bounds;
        for frame in 1..=2_000 {
            sim.tick(f64::from(frame) * 16.0, &mut rng);
            for body in sim.bodies() {
                // Walls are inclusive: reflection clamps exactly onto them.
                assert!(
                    (bounds.x0..=bounds.x1).contains(&body.position.x)
                        && (bounds.y0..=bounds.y1).contains(&body.position.y),
                    "body escaped bounds at frame {frame}: {:?}",
                    body.position
                );
            }
        }
    }

    #[test]
    fn fade_is_monotone_up_then_down() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut sim = sim();
        let id = sim.spawn(Point::new(50.0, 50.0), 0.0);
        let fade_in = sim.params().fade_in_ms;

        let mut last = -1.0;
        let mut now = 0.0;
        while now < fade_in {
            now += 16.0;
            sim.tick(now, &mut rng);
            let opacity = sim.body(id).expect("body live during fade-in").opacity;
            assert!(opacity >= last, "fade-in must be non-decreasing");
            last = opacity;
        }
        while let Some(body) = sim.body(id) {
            let opacity = body.opacity;
            assert!(opacity <= last, "fade-out must be non-increasing");
            last = opacity;
            now += 250.0;
            sim.tick(now, &mut rng);
        }
    }

    #[test]
    fn freshly_spawned_body_survives_immediate_tick() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut sim = sim();
        let id = sim.spawn(Point::new(50.0, 50.0), 1_000.0);
        // One frame after spawn the opacity is still below the removal
        // epsilon, but the body is fading in, not out.
        sim.tick(1_005.0, &mut rng);
        let body = sim.body(id).expect("fading-in body must survive");
        assert!(body.opacity < sim.params().removal_epsilon);
    }

    #[test]
    fn faded_body_is_removed_same_tick_unless_pinned() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut sim = sim();
        let fading = sim.spawn(Point::new(20.0, 20.0), 0.0);
        let pinned = sim.spawn(Point::new(80.0, 80.0), 0.0);
        sim.set_pinned(pinned, true);

        let past_lifetime = sim.params().fade_in_ms + sim.params().fade_out_ms + 1.0;
        sim.tick(past_lifetime, &mut rng);

        assert!(sim.body(fading).is_none());
        let survivor = sim.body(pinned).expect("pinned body survives");
        assert_eq!(survivor.opacity, 1.0);
    }

    #[test]
    fn drag_freezes_body_and_release_keeps_position() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut sim = sim();
        let id = sim.spawn(Point::new(50.0, 50.0), 0.0);
        sim.tick(16.0, &mut rng);

        assert!(sim.begin_drag(id, 16.0));
        let body = sim.body(id).unwrap();
        assert!(body.dragged_by_user);
        assert_eq!(body.opacity, 1.0);
        assert_eq!(body.scale, sim.params().lifted_scale);

        sim.drag_to(id, Point::new(30.0, 40.0), 48.0);
        // Ticks while dragging must not move the body.
        sim.tick(64.0, &mut rng);
        assert_eq!(sim.body(id).unwrap().position, Point::new(30.0, 40.0));

        sim.drag_to(id, Point::new(28.0, 38.0), 80.0);
        sim.end_drag(id, 80.0);
        // No jump: position at release equals the last dragged position.
        assert_eq!(sim.body(id).unwrap().position, Point::new(28.0, 38.0));
        assert!(!sim.body(id).unwrap().dragged_by_user);
    }

    #[test]
    fn release_velocity_points_along_recent_motion() {
        let mut sim = sim();
        let id = sim.spawn(Point::new(10.0, 90.0), 0.0);
        sim.begin_drag(id, 0.0);
        // Steady drag to the upper right.
        for i in 1..=6 {
            let t = f64::from(i) * 16.0;
            sim.drag_to(id, Point::new(10.0 + t * 0.1, 90.0 - t * 0.05), t);
        }
        let v = sim.end_drag(id, 96.0).expect("drag was active");
        assert!(v.x > 0.0);
        assert!(v.y < 0.0);
        assert_eq!(sim.body(id).unwrap().velocity, v);
    }

    #[test]
    fn release_with_stationary_pointer_is_zero() {
        let mut sim = sim();
        let id = sim.spawn(Point::new(50.0, 50.0), 0.0);
        sim.begin_drag(id, 0.0);
        let v = sim.end_drag(id, 500.0).expect("drag was active");
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn end_drag_for_wrong_body_is_none() {
        let mut sim = sim();
        let a = sim.spawn(Point::new(10.0, 10.0), 0.0);
        let b = sim.spawn(Point::new(20.0, 20.0), 0.0);
        sim.begin_drag(a, 0.0);
        assert!(sim.end_drag(b, 10.0).is_none());
        // The original drag is still active and can be ended normally.
        assert!(sim.end_drag(a, 10.0).is_some());
    }

    #[test]
    fn removing_dragged_body_clears_drag_tracking() {
        let mut sim = sim();
        let id = sim.spawn(Point::new(10.0, 10.0), 0.0);
        sim.begin_drag(id, 0.0);
        sim.remove(id);
        assert!(sim.body(id).is_none());
        assert!(sim.end_drag(id, 100.0).is_none());
    }
}

//! Smoothed travel direction.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Rate at which the current angle closes the gap to the target, per second.
pub const DEFAULT_TURN_RATE: f32 = 10.0;

/// Smoothed 2-D direction holding a current and a target angle.
///
/// Angles are kept wrapped into `[0, 2π)`. [`Heading::update`] moves the
/// current angle toward the target along the shorter arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heading {
    current: f32,
    target: f32,
    turn_rate: f32,
}

impl Heading {
    /// Creates a heading pointing at `angle` with the default turn rate.
    #[must_use]
    pub fn new(angle: f32) -> Self {
        Self::with_turn_rate(angle, DEFAULT_TURN_RATE)
    }

    /// Creates a heading pointing at `angle` that turns at `turn_rate`.
    #[must_use]
    pub fn with_turn_rate(angle: f32, turn_rate: f32) -> Self {
        let angle = if angle.is_finite() { wrap(angle) } else { 0.0 };
        Self {
            current: angle,
            target: angle,
            turn_rate: turn_rate.max(0.0),
        }
    }

    /// Effective angle the agent currently travels along.
    #[must_use]
    pub const fn current_angle(&self) -> f32 {
        self.current
    }

    /// Angle the heading is being smoothed toward.
    #[must_use]
    pub const fn target_angle(&self) -> f32 {
        self.target
    }

    /// Unit vector for the current angle.
    #[must_use]
    pub fn vector(&self) -> Vec2 {
        Vec2::new(self.current.cos(), self.current.sin())
    }

    /// Moves the current angle a `turn_rate * dt` fraction of the way toward
    /// the target.
    pub fn update(&mut self, dt: f32) {
        let fraction = (self.turn_rate * dt).clamp(0.0, 1.0);
        if !fraction.is_finite() {
            return;
        }
        let gap = shortest_arc(self.current, self.target);
        self.current = wrap(self.current + gap * fraction);
    }

    /// Points both angles along `direction` immediately.
    ///
    /// Zero-length and non-finite vectors are ignored.
    pub fn set_now(&mut self, direction: Vec2) {
        if !direction.is_finite() || direction == Vec2::ZERO {
            return;
        }
        let angle = wrap(angle_of(direction));
        self.current = angle;
        self.target = angle;
    }

    /// Sets the target angle only; the current angle follows smoothly.
    pub fn assign(&mut self, angle: f32) {
        if angle.is_finite() {
            self.target = wrap(angle);
        }
    }

    /// Offsets the target angle by `delta`.
    pub fn nudge(&mut self, delta: f32) {
        if delta.is_finite() {
            self.target = wrap(self.target + delta);
        }
    }

    /// Offsets both angles by `delta`, bypassing smoothing.
    pub fn add_now(&mut self, delta: f32) {
        if delta.is_finite() {
            self.current = wrap(self.current + delta);
            self.target = wrap(self.target + delta);
        }
    }
}

/// Angle of `direction` measured counter-clockwise from the positive x axis.
#[must_use]
pub(crate) fn angle_of(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x)
}

fn wrap(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

fn shortest_arc(from: f32, to: f32) -> f32 {
    (to - from + PI).rem_euclid(TAU) - PI
}

//! Circular shapes and the per-frame update step.
//!
//! A shape's `kind` decides which parts of an `Intent` it responds to:
//! - `Translating`: arrow keys move it, the radius is fixed
//! - `Growing`: stays put, grow/shrink change the radius
//! - `Roaming`: both
//!
//! Invariants (hold after construction and after every `apply`):
//! - `range.min <= radius <= range.max`
//! - `radius <= x <= width - radius` and `radius <= y <= height - radius`

use glam::Vec2;

use super::{CircleItem, Rgba};
use crate::input::Intent;

/// The area shapes must stay inside, in window pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Clamp a circle center so the whole circle is inside the playfield.
    ///
    /// Written as `min(hi, max(lo, v))` rather than `f32::clamp` so a circle wider
    /// than the playfield still yields a value instead of panicking.
    pub fn clamp_center(&self, center: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            (self.width - radius).min(center.x.max(radius)),
            (self.height - radius).min(center.y.max(radius)),
        )
    }
}

/// Inclusive radius bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RadiusRange {
    pub min: f32,
    pub max: f32,
}

impl RadiusRange {
    #[inline]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that only admits `radius`.
    #[inline]
    pub fn fixed(radius: f32) -> Self {
        Self {
            min: radius,
            max: radius,
        }
    }

    #[inline]
    pub fn contains(&self, radius: f32) -> bool {
        self.min <= radius && radius <= self.max
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ShapeKind {
    Translating { speed: f32 },
    Growing { step: f32 },
    Roaming { speed: f32, step: f32 },
}

impl ShapeKind {
    /// Distance per frame per held direction, if this kind moves.
    #[inline]
    pub fn speed(&self) -> Option<f32> {
        match *self {
            ShapeKind::Translating { speed } | ShapeKind::Roaming { speed, .. } => Some(speed),
            ShapeKind::Growing { .. } => None,
        }
    }

    /// Radius delta per frame, if this kind grows/shrinks.
    #[inline]
    pub fn growth_step(&self) -> Option<f32> {
        match *self {
            ShapeKind::Growing { step } | ShapeKind::Roaming { step, .. } => Some(step),
            ShapeKind::Translating { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    pub position: Vec2,
    pub radius: f32,
    pub range: RadiusRange,
    pub color: Rgba,
}

impl Shape {
    /// Create a shape, pulling the radius into `range` and the position into `field`.
    pub fn new(
        name: impl Into<String>,
        kind: ShapeKind,
        position: Vec2,
        radius: f32,
        range: RadiusRange,
        color: Rgba,
        field: Playfield,
    ) -> Self {
        let radius = range.max.min(radius.max(range.min));
        Self {
            name: name.into(),
            kind,
            position: field.clamp_center(position, radius),
            radius,
            range,
            color,
        }
    }

    /// Advance one frame.
    ///
    /// Order: translate, clamp, grow, clamp, shrink, clamp. Holding grow and shrink
    /// together therefore nets out (unless grow was already capped at `max`).
    pub fn apply(&mut self, intent: Intent, field: Playfield) {
        if let Some(speed) = self.kind.speed() {
            let dir = Vec2::new(intent.move_x as f32, intent.move_y as f32);
            if dir != Vec2::ZERO {
                self.position += dir * speed;
                self.clamp_to(field);
            }
        }

        if let Some(step) = self.kind.growth_step() {
            if intent.grow {
                self.radius = self.range.max.min(self.radius + step);
                self.clamp_to(field);
            }
            if intent.shrink {
                self.radius = self.range.min.max(self.radius - step);
                self.clamp_to(field);
            }
        }
    }

    #[inline]
    fn clamp_to(&mut self, field: Playfield) {
        self.position = field.clamp_center(self.position, self.radius);
    }

    pub fn to_item(&self) -> CircleItem {
        CircleItem {
            center: self.position.to_array(),
            radius: self.radius,
            fill: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: Playfield = Playfield {
        width: 640.0,
        height: 400.0,
    };

    fn dot(x: f32, y: f32) -> Shape {
        Shape::new(
            "dot",
            ShapeKind::Roaming {
                speed: 5.0,
                step: 1.0,
            },
            Vec2::new(x, y),
            10.0,
            RadiusRange::new(2.0, 40.0),
            Rgba::WHITE,
            FIELD,
        )
    }

    fn intent(move_x: i8, move_y: i8, grow: bool, shrink: bool) -> Intent {
        Intent {
            move_x,
            move_y,
            grow,
            shrink,
        }
    }

    fn assert_invariants(s: &Shape) {
        assert!(s.range.contains(s.radius), "radius {} out of range", s.radius);
        assert!(s.radius <= s.position.x && s.position.x <= FIELD.width - s.radius);
        assert!(s.radius <= s.position.y && s.position.y <= FIELD.height - s.radius);
    }

    #[test]
    fn zero_intent_is_a_no_op() {
        let mut s = dot(123.0, 77.0);
        let before = s.clone();
        s.apply(Intent::NONE, FIELD);
        assert_eq!(s, before);
    }

    #[test]
    fn one_step_right_moves_by_speed() {
        let mut s = dot(320.0, 200.0);
        s.apply(intent(1, 0, false, false), FIELD);
        assert_eq!(s.position, Vec2::new(325.0, 200.0));
    }

    #[test]
    fn step_right_near_edge_is_cut_short() {
        let mut s = dot(628.0, 200.0);
        let expected = 628.0 + 5.0f32.min(FIELD.width - s.radius - 628.0);
        s.apply(intent(1, 0, false, false), FIELD);
        assert_eq!(s.position.x, expected);
        assert_eq!(s.position.x, 630.0);
    }

    #[test]
    fn left_edge_holds() {
        let mut s = dot(10.0, 200.0);
        s.apply(intent(-1, 0, false, false), FIELD);
        assert_eq!(s.position.x, s.radius);
    }

    #[test]
    fn up_is_negative_y_and_top_edge_holds() {
        let mut s = dot(100.0, 12.0);
        s.apply(intent(0, -1, false, false), FIELD);
        assert_eq!(s.position.y, 10.0);
    }

    #[test]
    fn grow_at_max_and_shrink_at_min_are_no_ops() {
        let mut s = dot(320.0, 200.0);
        s.radius = 40.0;
        s.apply(intent(0, 0, true, false), FIELD);
        assert_eq!(s.radius, 40.0);

        s.radius = 2.0;
        s.apply(intent(0, 0, false, true), FIELD);
        assert_eq!(s.radius, 2.0);
    }

    #[test]
    fn grow_then_shrink_nets_out() {
        let mut s = dot(320.0, 200.0);
        s.apply(intent(0, 0, true, true), FIELD);
        assert_eq!(s.radius, 10.0);
    }

    #[test]
    fn growing_against_a_wall_pushes_the_center_inwards() {
        let mut s = dot(10.0, 10.0);
        s.apply(intent(0, 0, true, false), FIELD);
        assert_eq!(s.radius, 11.0);
        assert_eq!(s.position, Vec2::new(11.0, 11.0));
        assert_invariants(&s);
    }

    #[test]
    fn translating_kind_ignores_growth() {
        let mut s = dot(320.0, 200.0);
        s.kind = ShapeKind::Translating { speed: 5.0 };
        s.apply(intent(0, 1, true, false), FIELD);
        assert_eq!(s.radius, 10.0);
        assert_eq!(s.position.y, 205.0);
    }

    #[test]
    fn growing_kind_ignores_movement() {
        let mut s = Shape::new(
            "claw",
            ShapeKind::Growing { step: 2.0 },
            Vec2::new(500.0, 200.0),
            20.0,
            RadiusRange::new(5.0, 80.0),
            Rgba::WHITE,
            FIELD,
        );
        s.apply(intent(-1, -1, true, false), FIELD);
        assert_eq!(s.position, Vec2::new(500.0, 200.0));
        assert_eq!(s.radius, 22.0);
    }

    #[test]
    fn construction_clamps_radius_and_position() {
        let s = Shape::new(
            "big",
            ShapeKind::Roaming {
                speed: 1.0,
                step: 1.0,
            },
            Vec2::new(0.0, 1000.0),
            100.0,
            RadiusRange::new(2.0, 40.0),
            Rgba::WHITE,
            FIELD,
        );
        assert_eq!(s.radius, 40.0);
        assert_eq!(s.position, Vec2::new(40.0, 360.0));
    }

    #[test]
    fn invariants_hold_over_a_long_random_walk() {
        // Deterministic LCG so the walk is reproducible.
        let mut seed: u32 = 0x1234_5678;
        let mut next = move || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            seed >> 16
        };

        let mut s = dot(320.0, 200.0);
        for _ in 0..5_000 {
            let r = next();
            let i = intent(
                (r % 3) as i8 - 1,
                ((r / 3) % 3) as i8 - 1,
                (r / 9) % 2 == 0,
                (r / 18) % 3 == 0,
            );
            s.apply(i, FIELD);
            assert_invariants(&s);
        }
    }

    #[test]
    fn degenerate_playfield_does_not_panic() {
        let tiny = Playfield::new(10.0, 10.0);
        let c = tiny.clamp_center(Vec2::new(5.0, 5.0), 20.0);
        assert!(c.x.is_finite() && c.y.is_finite());
    }
}

//! Narrow-phase collision tests
//!
//! All functions here are pure and stateless: they take explicit positions
//! and collider descriptors, never entity handles. The boundary semantics
//! are a contract, not an accident:
//! - Shape-overlap tests are STRICT: exactly touching edges or tangent
//!   circles do not overlap.
//! - Point-containment tests are INCLUSIVE: a point exactly on the boundary
//!   is inside.
//! Both sides of that asymmetry are pinned by tests below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from center point and half-extents
    pub fn from_center_half(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box from top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }
}

/// Collider shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half: Vec2 },
}

/// A shape plus a local offset, attachable to any positioned entity.
/// The offset is added to the entity's world position before any test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: Shape,
    pub offset: Vec2,
}

impl Collider {
    /// Circle collider centered on the entity position
    pub fn circle(radius: f32) -> Self {
        assert!(radius > 0.0, "collider radius must be positive");
        Self {
            shape: Shape::Circle { radius },
            offset: Vec2::ZERO,
        }
    }

    /// Rectangle collider centered on the entity position
    pub fn rect(half: Vec2) -> Self {
        assert!(
            half.x > 0.0 && half.y > 0.0,
            "collider half-extents must be positive"
        );
        Self {
            shape: Shape::Rect { half },
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// World-space bounds for broad-phase insertion
    pub fn bounds(&self, pos: Vec2) -> Aabb {
        let center = pos + self.offset;
        match self.shape {
            Shape::Circle { radius } => Aabb::from_center_half(center, Vec2::splat(radius)),
            Shape::Rect { half } => Aabb::from_center_half(center, half),
        }
    }
}

/// Strict AABB overlap: exactly touching edges do not count
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// Strict circle overlap: tangent circles do not count
#[inline]
pub fn circle_overlap(center_a: Vec2, radius_a: f32, center_b: Vec2, radius_b: f32) -> bool {
    let r = radius_a + radius_b;
    center_a.distance_squared(center_b) < r * r
}

/// Strict circle/AABB overlap via nearest-point clamp
#[inline]
pub fn circle_aabb_overlap(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    let closest = center.clamp(rect.min, rect.max);
    center.distance_squared(closest) < radius * radius
}

/// Inclusive point-in-circle: a point exactly on the boundary is inside
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Inclusive point-in-AABB: a point exactly on an edge is inside
#[inline]
pub fn point_in_aabb(point: Vec2, rect: &Aabb) -> bool {
    point.x >= rect.min.x && point.x <= rect.max.x && point.y >= rect.min.y && point.y <= rect.max.y
}

/// Exact overlap test between two positioned colliders
///
/// Adds each collider's local offset to its position, then dispatches on
/// the shape pair.
pub fn colliders_overlap(pos_a: Vec2, a: &Collider, pos_b: Vec2, b: &Collider) -> bool {
    let ca = pos_a + a.offset;
    let cb = pos_b + b.offset;
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_overlap(ca, ra, cb, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half }) => {
            circle_aabb_overlap(ca, radius, &Aabb::from_center_half(cb, half))
        }
        (Shape::Rect { half }, Shape::Circle { radius }) => {
            circle_aabb_overlap(cb, radius, &Aabb::from_center_half(ca, half))
        }
        (Shape::Rect { half: ha }, Shape::Rect { half: hb }) => aabb_overlap(
            &Aabb::from_center_half(ca, ha),
            &Aabb::from_center_half(cb, hb),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_aabb_overlap_basic() {
        let a = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0));
        let b = Aabb::from_pos_size(Vec2::new(25.0, 25.0), Vec2::new(50.0, 50.0));
        assert!(aabb_overlap(&a, &b));

        let far = Aabb::from_pos_size(Vec2::new(200.0, 0.0), Vec2::new(50.0, 50.0));
        assert!(!aabb_overlap(&a, &far));
    }

    #[test]
    fn test_aabb_touching_edges_do_not_overlap() {
        let a = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0));
        let b = Aabb::from_pos_size(Vec2::new(50.0, 0.0), Vec2::new(50.0, 50.0));
        assert!(!aabb_overlap(&a, &b));
        assert!(!aabb_overlap(&b, &a));
    }

    #[test]
    fn test_circle_tangency_is_not_overlap() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // distance == r1 + r2 exactly
        assert!(!circle_overlap(a, 6.0, b, 4.0));
        // A hair closer overlaps
        assert!(circle_overlap(a, 6.0, Vec2::new(9.99, 0.0), 4.0));
    }

    #[test]
    fn test_circle_aabb_overlap() {
        let rect = Aabb::from_pos_size(Vec2::new(0.0, 0.0), Vec2::new(40.0, 40.0));
        // Circle touching the right edge exactly: strict miss
        assert!(!circle_aabb_overlap(Vec2::new(50.0, 20.0), 10.0, &rect));
        // Penetrating
        assert!(circle_aabb_overlap(Vec2::new(49.0, 20.0), 10.0, &rect));
        // Center inside the box
        assert!(circle_aabb_overlap(Vec2::new(20.0, 20.0), 1.0, &rect));
    }

    #[test]
    fn test_point_tests_are_inclusive_on_the_boundary() {
        // Deliberately the opposite polarity of the shape-overlap tests
        assert!(point_in_circle(Vec2::new(5.0, 0.0), Vec2::ZERO, 5.0));
        assert!(point_in_circle(Vec2::new(3.0, 4.0), Vec2::ZERO, 5.0));
        assert!(!point_in_circle(Vec2::new(5.01, 0.0), Vec2::ZERO, 5.0));

        let rect = Aabb::from_pos_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(point_in_aabb(Vec2::new(10.0, 10.0), &rect));
        assert!(point_in_aabb(Vec2::new(0.0, 5.0), &rect));
        assert!(!point_in_aabb(Vec2::new(10.1, 5.0), &rect));
    }

    #[test]
    fn test_collider_offset_applied_before_test() {
        let a = Collider::circle(5.0).with_offset(Vec2::new(100.0, 0.0));
        let b = Collider::circle(5.0);
        // Positions coincide, but a's offset moves it out of range
        assert!(!colliders_overlap(Vec2::ZERO, &a, Vec2::ZERO, &b));
        // b positioned under a's offset center collides
        assert!(colliders_overlap(Vec2::ZERO, &a, Vec2::new(95.0, 0.0), &b));
    }

    #[test]
    fn test_collider_dispatch_circle_rect() {
        let circle = Collider::circle(10.0);
        let rect = Collider::rect(Vec2::new(20.0, 20.0));
        assert!(colliders_overlap(
            Vec2::new(25.0, 0.0),
            &circle,
            Vec2::ZERO,
            &rect
        ));
        // Symmetric dispatch
        assert!(colliders_overlap(
            Vec2::ZERO,
            &rect,
            Vec2::new(25.0, 0.0),
            &circle
        ));
        assert!(!colliders_overlap(
            Vec2::new(100.0, 0.0),
            &circle,
            Vec2::ZERO,
            &rect
        ));
    }

    #[test]
    #[should_panic]
    fn test_zero_radius_collider_panics() {
        let _ = Collider::circle(0.0);
    }

    proptest! {
        #[test]
        fn prop_aabb_overlap_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..100.0, ah in 1.0f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..100.0, bh in 1.0f32..100.0,
        ) {
            let a = Aabb::from_pos_size(Vec2::new(ax, ay), Vec2::new(aw, ah));
            let b = Aabb::from_pos_size(Vec2::new(bx, by), Vec2::new(bw, bh));
            prop_assert_eq!(aabb_overlap(&a, &b), aabb_overlap(&b, &a));
        }

        #[test]
        fn prop_circle_overlap_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.1f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.1f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circle_overlap(a, ar, b, br), circle_overlap(b, br, a, ar));
        }
    }
}

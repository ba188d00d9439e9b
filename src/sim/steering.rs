//! Composable steering forces
//!
//! Behaviors are tagged variants with weights, not a class hierarchy: the
//! AI decision step builds a list of `WeightedSteering` with concrete
//! targets baked in, and `accumulate` folds them into one acceleration
//! every integration tick. Each individual force and the combined result
//! are truncated to the agent's `max_force`.

use glam::Vec2;

/// Waypoint arrival radius for patrol-style seeking
pub const ARRIVAL_RADIUS: f32 = 12.0;

/// Wander circle projection distance ahead of the agent
pub const WANDER_DISTANCE: f32 = 60.0;
/// Wander circle radius
pub const WANDER_RADIUS: f32 = 40.0;
/// Max wander angle perturbation per decision (radians)
pub const WANDER_JITTER: f32 = 0.8;

/// One steering rule with its target data resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steering {
    /// Head straight for a point
    Seek { target: Vec2 },
    /// Head for where a moving target will be
    Pursue { target: Vec2, target_vel: Vec2 },
    /// Jitter on a circle projected ahead of the agent
    Wander { theta: f32 },
    /// Push away from nearby agents
    Separation { radius: f32 },
}

/// A behavior and its blend weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSteering {
    pub steering: Steering,
    pub weight: f32,
}

/// Clamp a vector's length to `max`
#[inline]
pub fn truncate(v: Vec2, max: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Classic seek: steer toward desired velocity at full speed
fn seek_force(pos: Vec2, vel: Vec2, target: Vec2, max_speed: f32) -> Vec2 {
    let to_target = target - pos;
    if to_target.length_squared() < 1e-6 {
        return Vec2::ZERO;
    }
    let desired = to_target.normalize() * max_speed;
    desired - vel
}

/// Pursue: seek the target's predicted position, leading by distance/speed
fn pursue_force(pos: Vec2, vel: Vec2, target: Vec2, target_vel: Vec2, max_speed: f32) -> Vec2 {
    let lead = if max_speed > 0.0 {
        pos.distance(target) / max_speed
    } else {
        0.0
    };
    seek_force(pos, vel, target + target_vel * lead, max_speed)
}

/// Wander: seek a point on a circle projected along the current heading.
/// The wander angle itself is jittered by the decision step, not here.
fn wander_force(pos: Vec2, vel: Vec2, theta: f32, max_speed: f32) -> Vec2 {
    let heading = if vel.length_squared() > 1e-6 {
        vel.normalize()
    } else {
        // Stationary agents drift backward along the scroll axis
        Vec2::new(0.0, -1.0)
    };
    let center = pos + heading * WANDER_DISTANCE;
    let target = center + Vec2::new(theta.cos(), theta.sin()) * WANDER_RADIUS;
    seek_force(pos, vel, target, max_speed)
}

/// Separation: inverse-overlap push away from each neighbor inside `radius`
fn separation_force(pos: Vec2, neighbors: &[Vec2], radius: f32) -> Vec2 {
    let mut force = Vec2::ZERO;
    for &other in neighbors {
        let away = pos - other;
        let dist_sq = away.length_squared();
        if dist_sq > 1e-6 && dist_sq < radius * radius {
            let dist = dist_sq.sqrt();
            force += (away / dist) * (radius - dist);
        }
    }
    force
}

/// Evaluate one behavior into a raw steering force
pub fn steering_force(
    behavior: &Steering,
    pos: Vec2,
    vel: Vec2,
    max_speed: f32,
    neighbors: &[Vec2],
) -> Vec2 {
    match *behavior {
        Steering::Seek { target } => seek_force(pos, vel, target, max_speed),
        Steering::Pursue { target, target_vel } => {
            pursue_force(pos, vel, target, target_vel, max_speed)
        }
        Steering::Wander { theta } => wander_force(pos, vel, theta, max_speed),
        Steering::Separation { radius } => separation_force(pos, neighbors, radius),
    }
}

/// Weighted sum of all active behaviors, truncated to `max_force`
pub fn accumulate(
    behaviors: &[WeightedSteering],
    pos: Vec2,
    vel: Vec2,
    max_speed: f32,
    max_force: f32,
    neighbors: &[Vec2],
) -> Vec2 {
    let mut total = Vec2::ZERO;
    for wb in behaviors {
        let force = steering_force(&wb.steering, pos, vel, max_speed, neighbors);
        total += truncate(force, max_force) * wb.weight;
    }
    truncate(total, max_force)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_seek_points_at_target() {
        let force = steering_force(
            &Steering::Seek {
                target: Vec2::new(100.0, 0.0),
            },
            Vec2::ZERO,
            Vec2::ZERO,
            50.0,
            &[],
        );
        assert!(force.x > 0.0);
        assert!(force.y.abs() < 0.001);
    }

    #[test]
    fn test_seek_at_target_is_braking_only() {
        // On top of the target there is no desired direction; the force
        // must not explode
        let force = steering_force(
            &Steering::Seek { target: Vec2::ZERO },
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            50.0,
            &[],
        );
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_pursue_leads_a_moving_target() {
        let pos = Vec2::ZERO;
        let target = Vec2::new(100.0, 0.0);
        let target_vel = Vec2::new(0.0, 80.0);
        let pursue = steering_force(
            &Steering::Pursue { target, target_vel },
            pos,
            Vec2::ZERO,
            50.0,
            &[],
        );
        let seek = steering_force(&Steering::Seek { target }, pos, Vec2::ZERO, 50.0, &[]);
        // Prediction pulls the aim toward the target's velocity
        assert!(pursue.y > seek.y);
    }

    #[test]
    fn test_separation_pushes_away_from_neighbors() {
        let force = steering_force(
            &Steering::Separation { radius: 50.0 },
            Vec2::ZERO,
            Vec2::ZERO,
            50.0,
            &[Vec2::new(10.0, 0.0)],
        );
        assert!(force.x < 0.0);

        // Out-of-radius neighbors contribute nothing
        let none = steering_force(
            &Steering::Separation { radius: 50.0 },
            Vec2::ZERO,
            Vec2::ZERO,
            50.0,
            &[Vec2::new(100.0, 0.0)],
        );
        assert_eq!(none, Vec2::ZERO);
    }

    #[test]
    fn test_wander_force_is_bounded() {
        let force = steering_force(
            &Steering::Wander { theta: 1.3 },
            Vec2::ZERO,
            Vec2::new(0.0, 40.0),
            60.0,
            &[],
        );
        // Desired speed never exceeds max_speed, so the raw force is
        // bounded by max_speed + |vel|
        assert!(force.length() <= 60.0 + 40.0 + 0.001);
    }

    #[test]
    fn test_accumulate_respects_max_force() {
        let behaviors = [
            WeightedSteering {
                steering: Steering::Seek {
                    target: Vec2::new(1000.0, 0.0),
                },
                weight: 3.0,
            },
            WeightedSteering {
                steering: Steering::Seek {
                    target: Vec2::new(0.0, 1000.0),
                },
                weight: 3.0,
            },
        ];
        let force = accumulate(&behaviors, Vec2::ZERO, Vec2::ZERO, 200.0, 75.0, &[]);
        assert!(force.length() <= 75.0 + 0.001);
    }

    proptest! {
        #[test]
        fn prop_truncate_never_exceeds_max(
            x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4, max in 0.0f32..500.0,
        ) {
            let clamped = truncate(Vec2::new(x, y), max);
            prop_assert!(clamped.length() <= max * 1.001 + 1e-3);
        }
    }
}

//! Collision response: position correction against fixed geometry plus the
//! velocity and yaw settling rules.

use glam::Vec3;

use crate::body::Body;

use super::integrator::{self, Predicted};
use super::{narrowphase, shape};

/// Resolve one dynamic body against every other body's predicted state.
///
/// Scans in table order and corrects against the first colliding body that
/// is fixed; collisions between two non-fixed bodies are detected but carry
/// no response, so their predicted state commits unmodified.
pub fn resolve(index: usize, predicted: &mut [Predicted], bodies: &[Body], gravity: Vec3) {
    debug_assert!(bodies[index].is_dynamic());

    let mut state = predicted[index];
    let vertices = shape::box_vertices(state.position, state.orientation, bodies[index].extent);

    for (other_index, other) in bodies.iter().enumerate() {
        if other_index == index {
            continue;
        }
        let other_state = &predicted[other_index];
        let other_vertices =
            shape::box_vertices(other_state.position, other_state.orientation, other.extent);

        let initial = state.position - other_state.position;
        let Some(simplex) = narrowphase::intersect_planar(&vertices, &other_vertices, initial)
        else {
            continue;
        };
        if !other.fixed {
            continue;
        }

        let push = narrowphase::penetration(&simplex, &vertices, &other_vertices);
        state.position -= push;
        settle_velocity(&mut state.velocity, push, gravity);
        settle_yaw(&mut state.orientation, push);
        break;
    }

    predicted[index] = state;
}

/// Three-valued sign; zero components compare as 0.
#[inline]
fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Per-axis velocity rule after a positional correction.
///
/// A component driving into the contact (sign matches the push) stops, and
/// so does one moving with gravity; only a component escaping against both
/// survives the correction.
fn settle_velocity(velocity: &mut Vec3, push: Vec3, gravity: Vec3) {
    let mut v = velocity.to_array();
    let p = push.to_array();
    let g = gravity.to_array();
    for axis in 0..3 {
        let moving = sign(v[axis]);
        if moving == sign(p[axis]) || moving == sign(g[axis]) {
            v[axis] = 0.0;
        }
    }
    *velocity = Vec3::from_array(v);
}

/// Coarse settle-to-surface rule: once yaw strays more than 45 degrees past
/// a right angle, snap it to the slope of the penetration vector. A level
/// push (`push.y == 0`) snaps to zero. An approximation, not a derived
/// contact rule.
fn settle_yaw(orientation: &mut Vec3, push: Vec3) {
    let deviation = orientation.z.rem_euclid(90.0);
    if deviation > 45.0 {
        let slope = if push.y == 0.0 {
            0.0
        } else {
            (push.x / push.y).atan().to_degrees()
        };
        orientation.z = integrator::wrap_degrees(slope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const GRAVITY: Vec3 = Vec3::new(0.0, -100.0, 0.0);

    fn predicted(body: &Body) -> Predicted {
        Predicted {
            position: body.position,
            orientation: body.orientation,
            velocity: body.velocity,
        }
    }

    #[test]
    fn test_corrects_against_fixed_body() {
        let mut falling = Body::new_dynamic(Vec3::new(0.0, -31.0, 0.0), Vec2::splat(20.0), 1.0);
        falling.velocity = Vec3::new(0.0, -25.0, 0.0);
        let floor = Body::new_fixed(Vec3::new(0.0, -50.0, 0.0), Vec2::splat(20.0));

        let bodies = [falling, floor];
        let mut states = [predicted(&falling), predicted(&floor)];

        resolve(0, &mut states, &bodies, GRAVITY);

        let eps = 1e-3;
        assert!((states[0].position.y - (-30.0)).abs() < eps);
        assert_eq!(states[0].velocity.y, 0.0);
    }

    #[test]
    fn test_sliding_velocity_survives() {
        let mut slider = Body::new_dynamic(Vec3::new(0.0, -0.1, 0.0), Vec2::splat(20.0), 1.0);
        slider.velocity = Vec3::new(100.0, -0.4, 0.0);
        let floor = Body::new_fixed(Vec3::new(0.0, -20.0, 0.0), Vec2::new(500.0, 20.0));

        let bodies = [slider, floor];
        let mut states = [predicted(&slider), predicted(&floor)];

        resolve(0, &mut states, &bodies, GRAVITY);

        // Downward motion stops against the floor, horizontal motion does
        // not: the push has no X component and neither does gravity.
        assert_eq!(states[0].velocity.x, 100.0);
        assert_eq!(states[0].velocity.y, 0.0);
    }

    #[test]
    fn test_escaping_velocity_kept() {
        // Moving up and out of the floor while gravity pulls down: the
        // component opposes both the push and gravity, so it is kept.
        let mut bouncing = Body::new_dynamic(Vec3::new(0.0, -31.0, 0.0), Vec2::splat(20.0), 1.0);
        bouncing.velocity = Vec3::new(0.0, 12.0, 0.0);
        let floor = Body::new_fixed(Vec3::new(0.0, -50.0, 0.0), Vec2::splat(20.0));

        let bodies = [bouncing, floor];
        let mut states = [predicted(&bouncing), predicted(&floor)];

        resolve(0, &mut states, &bodies, GRAVITY);
        assert_eq!(states[0].velocity.y, 12.0);
    }

    #[test]
    fn test_dynamic_pair_commits_unmodified() {
        // Two overlapping dynamic bodies: detected, but no response.
        let a = Body::new_dynamic(Vec3::ZERO, Vec2::splat(20.0), 1.0);
        let b = Body::new_dynamic(Vec3::new(5.0, 0.0, 0.0), Vec2::splat(20.0), 1.0);

        let bodies = [a, b];
        let mut states = [predicted(&a), predicted(&b)];

        resolve(0, &mut states, &bodies, GRAVITY);
        assert_eq!(states[0].position, Vec3::ZERO);
    }

    #[test]
    fn test_yaw_snaps_to_push_slope() {
        let mut tilted = Body::new_dynamic(Vec3::new(0.0, -31.0, 0.0), Vec2::splat(20.0), 1.0);
        tilted.orientation.z = 80.0;
        tilted.velocity = Vec3::new(0.0, -25.0, 0.0);
        let floor = Body::new_fixed(Vec3::new(0.0, -50.0, 0.0), Vec2::splat(20.0));

        let bodies = [tilted, floor];
        let mut states = [predicted(&tilted), predicted(&floor)];

        resolve(0, &mut states, &bodies, GRAVITY);

        // Push is straight down: atan(0 / -1) = 0 degrees.
        assert_eq!(states[0].orientation.z, 0.0);
    }

    #[test]
    fn test_yaw_below_threshold_untouched() {
        let mut tilted = Body::new_dynamic(Vec3::new(0.0, -31.0, 0.0), Vec2::splat(20.0), 1.0);
        tilted.orientation.z = 30.0;
        tilted.velocity = Vec3::new(0.0, -25.0, 0.0);
        let floor = Body::new_fixed(Vec3::new(0.0, -50.0, 0.0), Vec2::splat(20.0));

        let bodies = [tilted, floor];
        let mut states = [predicted(&tilted), predicted(&floor)];

        resolve(0, &mut states, &bodies, GRAVITY);
        assert_eq!(states[0].orientation.z, 30.0);
    }

    #[test]
    fn test_settle_velocity_axis_rules() {
        // Driving into the push: stopped.
        let mut v = Vec3::new(0.0, -10.0, 0.0);
        settle_velocity(&mut v, Vec3::new(0.0, -1.0, 0.0), GRAVITY);
        assert_eq!(v.y, 0.0);

        // Against the push and against gravity: kept.
        let mut v = Vec3::new(0.0, 10.0, 0.0);
        settle_velocity(&mut v, Vec3::new(0.0, -1.0, 0.0), GRAVITY);
        assert_eq!(v.y, 10.0);

        // Against the push but with gravity: stopped.
        let mut v = Vec3::new(0.0, -10.0, 0.0);
        settle_velocity(&mut v, Vec3::new(0.0, 1.0, 0.0), GRAVITY);
        assert_eq!(v.y, 0.0);
    }
}

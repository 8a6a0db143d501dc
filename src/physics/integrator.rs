//! Semi-implicit Euler integration over one sub-step.

use glam::Vec3;

use crate::body::Body;

/// Predicted state for one body over a sub-step, before collision
/// correction. Angular velocity is not affected by the pipeline, so only
/// the corrected fields are carried.
#[derive(Debug, Clone, Copy)]
pub struct Predicted {
    pub position: Vec3,
    pub orientation: Vec3,
    pub velocity: Vec3,
}

/// Advance one body by `dt` seconds.
///
/// Velocity integrates before position (semi-implicit Euler), with the
/// half-acceleration positional term. Anchored bodies pass through
/// untouched; kinematic bodies move by their externally-set velocity only.
/// A zero mass divides as one.
pub fn predict(body: &Body, gravity: Vec3, dt: f32) -> Predicted {
    let mut state = Predicted {
        position: body.position,
        orientation: body.orientation,
        velocity: body.velocity,
    };
    if body.is_anchored() {
        return state;
    }

    let acceleration = if body.kinematic {
        Vec3::ZERO
    } else if body.force == Vec3::ZERO {
        gravity
    } else {
        gravity + body.force / body.mass.max(1.0)
    };

    state.velocity += acceleration * dt;
    state.position += state.velocity * dt + 0.5 * acceleration * dt * dt;
    state.orientation = wrap_angles(state.orientation + body.angular_velocity * dt);
    state
}

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

#[inline]
fn wrap_angles(angles: Vec3) -> Vec3 {
    Vec3::new(
        wrap_degrees(angles.x),
        wrap_degrees(angles.y),
        wrap_degrees(angles.z),
    )
}

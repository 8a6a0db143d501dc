//! Body state and the boundary trait to entity storage.

use glam::{Vec2, Vec3};

/// A rigid body as seen by the simulation core.
///
/// Bodies are owned by the caller's entity storage; the core only reads and
/// mutates them in place through a [`BodySource`]. Orientation is stored in
/// degrees: `.x` pitch, `.y` roll, `.z` yaw (yaw turns about Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec3,
    /// Euler angles in degrees, wrapped into `[0, 360)` by integration.
    pub orientation: Vec3,
    /// Full box size (width, height). Half-extents are derived by halving.
    pub extent: Vec2,
    pub velocity: Vec3,
    /// Degrees per second, per axis.
    pub angular_velocity: Vec3,
    /// Accumulated external force, cleared after every simulation tick.
    pub force: Vec3,
    pub mass: f32,
    /// Never moved by integration. Still pushes overlapping bodies out.
    pub fixed: bool,
    /// Moved by externally-set velocity, exempt from collision response.
    pub kinematic: bool,
    /// Reserved; not consulted by the current pipeline.
    pub solid: bool,
}

impl Body {
    /// Create a dynamic body with the given mass.
    pub fn new_dynamic(position: Vec3, extent: Vec2, mass: f32) -> Self {
        Self {
            position,
            orientation: Vec3::ZERO,
            extent,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
            fixed: false,
            kinematic: false,
            solid: true,
        }
    }

    /// Create a fixed body (static geometry such as floors and walls).
    pub fn new_fixed(position: Vec3, extent: Vec2) -> Self {
        Self {
            position,
            orientation: Vec3::ZERO,
            extent,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 0.0,
            fixed: true,
            kinematic: false,
            solid: true,
        }
    }

    /// Create a kinematic body, moved by its velocity but never corrected.
    pub fn new_kinematic(position: Vec3, extent: Vec2) -> Self {
        Self {
            position,
            orientation: Vec3::ZERO,
            extent,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 0.0,
            fixed: false,
            kinematic: true,
            solid: true,
        }
    }

    /// Whether integration moves this body at all.
    #[inline]
    pub fn is_anchored(&self) -> bool {
        self.fixed && !self.kinematic
    }

    /// Whether collision response applies to this body.
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        !self.fixed && !self.kinematic
    }
}

/// Boundary between the simulation core and entity storage.
///
/// The core calls `refresh` once before a tick, mutates the slice returned
/// by `bodies_mut` through the sub-steps, and calls `commit` once after.
/// Bodies must not be added or removed while a tick is in flight.
pub trait BodySource {
    /// Pull body state from backing storage. Default: no-op.
    fn refresh(&mut self) {}

    /// The mutable body table for the current tick.
    fn bodies_mut(&mut self) -> &mut [Body];

    /// Publish mutated body state back to backing storage. Default: no-op.
    fn commit(&mut self) {}
}

/// A plain in-memory body table.
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    bodies: Vec<Body>,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its index in the table.
    pub fn push(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl BodySource for BodySet {
    fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_flags() {
        let dynamic = Body::new_dynamic(Vec3::ZERO, Vec2::splat(1.0), 2.0);
        assert!(dynamic.is_dynamic());
        assert!(!dynamic.is_anchored());

        let fixed = Body::new_fixed(Vec3::ZERO, Vec2::splat(1.0));
        assert!(fixed.is_anchored());
        assert!(!fixed.is_dynamic());

        let kinematic = Body::new_kinematic(Vec3::ZERO, Vec2::splat(1.0));
        assert!(!kinematic.is_anchored());
        assert!(!kinematic.is_dynamic());
    }

    #[test]
    fn test_body_set_round_trip() {
        let mut set = BodySet::new();
        let index = set.push(Body::new_dynamic(Vec3::new(1.0, 2.0, 3.0), Vec2::splat(4.0), 1.0));

        set.bodies_mut()[index].velocity = Vec3::X;
        assert_eq!(set.get(index).unwrap().velocity, Vec3::X);
        assert_eq!(set.len(), 1);
    }
}

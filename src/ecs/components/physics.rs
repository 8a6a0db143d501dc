//! Physics components for ECS entities.

use glam::{Vec2, Vec3};

/// Box footprint of an entity: full width and height.
#[derive(Debug, Clone, Copy)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Rigid body component.
#[derive(Debug, Clone)]
pub struct RigidBody {
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

impl RigidBody {
    /// Create a dynamic rigid body with the given mass.
    pub fn new_dynamic(mass: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass,
            fixed: false,
            kinematic: false,
            solid: true,
        }
    }

    /// Create a fixed rigid body (static geometry).
    pub fn new_fixed() -> Self {
        Self {
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 0.0,
            fixed: true,
            kinematic: false,
            solid: true,
        }
    }

    /// Create a kinematic rigid body.
    pub fn new_kinematic() -> Self {
        Self {
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 0.0,
            fixed: false,
            kinematic: true,
            solid: true,
        }
    }
}

//! Spatial components for ECS entities.

use glam::Vec3;

/// Position and orientation of an entity.
///
/// Orientation is Euler angles in degrees with the same axis mapping as
/// [`Body`](crate::body::Body): `.x` pitch, `.y` roll, `.z` yaw.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Vec3,
}

impl Pose {
    /// Create a pose from a position, with no rotation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Vec3::ZERO,
        }
    }
}

//! ECS components (pose, extent, rigid body).

pub mod physics;
pub mod transform;

pub use physics::*;
pub use transform::*;

//! Impetus physics engine
//!
//! Real-time rigid body simulation with GJK narrow-phase collision
//! detection and EPA penetration resolution.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **body** - body state and the boundary trait to entity storage
//! 2. **physics** - support functions, GJK/EPA narrowphase, semi-implicit
//!    Euler integration, collision response, and the sub-stepped pipeline
//! 3. **scheduler** - fixed-hertz background loop decoupled from rendering
//! 4. **ecs** - hecs entity storage integration (feature = "ecs")

pub mod body;
pub mod physics;
pub mod scheduler;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use body::{Body, BodySet, BodySource};

pub use physics::{PhysicsConfig, Simulation};

pub use scheduler::{Scheduler, SchedulerError};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;

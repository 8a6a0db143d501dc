//! CPU rigid body simulation with GJK/EPA collision detection.
//!
//! # Architecture
//!
//! Each tick runs a fixed number of sub-steps; every sub-step:
//!
//! 1. Predict new position/orientation for every body (semi-implicit Euler)
//! 2. Pairwise GJK over predicted positions, dynamic bodies in table order
//! 3. EPA penetration vectors for collisions against fixed bodies
//! 4. Correct positions, settle velocity and yaw
//! 5. Commit predicted state (kinematic bodies commit uncorrected)
//!
//! Force accumulators are cleared once after the last sub-step.

pub mod integrator;
pub mod narrowphase;
pub mod response;
pub mod shape;

use glam::Vec3;

use crate::body::{Body, BodySource};

use self::integrator::Predicted;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81, 0).
    pub gravity: Vec3,
    /// Number of sub-steps per simulated tick. Default: 4.
    pub iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            iterations: 4,
        }
    }
}

/// The simulation pipeline over a body table.
///
/// Stateless apart from its configuration: `simulate` is synchronous and
/// deterministic, so tests drive it directly while the
/// [`Scheduler`](crate::scheduler::Scheduler) drives it from a background
/// thread.
pub struct Simulation {
    config: PhysicsConfig,
}

impl Simulation {
    /// Create a simulation with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance every body in `source` by `time_step` seconds.
    ///
    /// A non-positive `time_step` returns without touching any state.
    pub fn simulate(&self, time_step: f32, source: &mut dyn BodySource) {
        if time_step <= 0.0 {
            return;
        }

        source.refresh();
        let iterations = self.config.iterations.max(1);
        let dt = time_step / iterations as f32;
        {
            let bodies = source.bodies_mut();
            for _ in 0..iterations {
                self.sub_step(dt, bodies);
            }
            for body in bodies.iter_mut() {
                body.force = Vec3::ZERO;
            }
        }
        source.commit();
    }

    fn sub_step(&self, dt: f32, bodies: &mut [Body]) {
        // Predict every body up front; resolution reads this table, so
        // corrections made for earlier bodies are visible to later ones.
        let mut predicted: Vec<Predicted> = bodies
            .iter()
            .map(|body| integrator::predict(body, self.config.gravity, dt))
            .collect();

        for index in 0..bodies.len() {
            if bodies[index].is_dynamic() {
                response::resolve(index, &mut predicted, bodies, self.config.gravity);
            }
        }

        // Kinematic bodies take their prediction unmodified; anchored
        // bodies never moved.
        for (body, state) in bodies.iter_mut().zip(&predicted) {
            if body.is_anchored() {
                continue;
            }
            body.position = state.position;
            body.orientation = state.orientation;
            body.velocity = state.velocity;
        }
    }
}

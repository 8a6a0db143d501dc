//! Bridge between hecs entity storage and the simulation body table.

use hecs::Entity;

use crate::body::{Body, BodySource};

use super::components::{Extent, Pose, RigidBody};

/// Spawn an entity carrying the full set of physics components.
pub fn spawn_body(world: &mut hecs::World, pose: Pose, extent: Extent, body: RigidBody) -> Entity {
    world.spawn((pose, extent, body))
}

/// A [`BodySource`] backed by a `hecs::World`.
///
/// `refresh` gathers every entity with `Pose`, `Extent`, and `RigidBody`
/// components into a flat body table; `commit` writes mutated state back.
/// Entities may be spawned or despawned between ticks only; a running tick
/// holds the gathered table.
pub struct EcsBodySource {
    world: hecs::World,
    entities: Vec<Entity>,
    bodies: Vec<Body>,
}

impl EcsBodySource {
    pub fn new(world: hecs::World) -> Self {
        Self {
            world,
            entities: Vec::new(),
            bodies: Vec::new(),
        }
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }
}

impl Default for EcsBodySource {
    fn default() -> Self {
        Self::new(hecs::World::new())
    }
}

impl BodySource for EcsBodySource {
    fn refresh(&mut self) {
        self.entities.clear();
        self.bodies.clear();
        for (entity, (pose, extent, rb)) in
            self.world.query_mut::<(&Pose, &Extent, &RigidBody)>()
        {
            self.entities.push(entity);
            self.bodies.push(Body {
                position: pose.position,
                orientation: pose.orientation,
                extent: extent.as_vec2(),
                velocity: rb.velocity,
                angular_velocity: rb.angular_velocity,
                force: rb.force,
                mass: rb.mass,
                fixed: rb.fixed,
                kinematic: rb.kinematic,
                solid: rb.solid,
            });
        }
    }

    fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    fn commit(&mut self) {
        for (entity, body) in self.entities.iter().zip(&self.bodies) {
            if let Ok((pose, rb)) = self
                .world
                .query_one_mut::<(&mut Pose, &mut RigidBody)>(*entity)
            {
                pose.position = body.position;
                pose.orientation = body.orientation;
                rb.velocity = body.velocity;
                rb.angular_velocity = body.angular_velocity;
                rb.force = body.force;
            }
        }
    }
}

//! Steering system: computes each drone's blended acceleration for the frame.
//!
//! Reads only the frame snapshot (spatial index) and the drone's own
//! components; writes only the drone's [`Steering`] and [`FlightPhase`].
//! Integration is deferred to the movement system so every drone steers
//! against the same pre-step world (synchronous update).

use bevy_ecs::prelude::{Entity, Query, Res};

use crate::config::FlockingConfig;
use crate::ecs::{FlightPhase, Goal, Position, Steering};
use crate::obstacles::ObstacleField;
use crate::spatial::SpatialIndex;
use crate::steering::compute_steering;

pub fn steering_system(
    config: Res<FlockingConfig>,
    index: Res<SpatialIndex>,
    obstacles: Res<ObstacleField>,
    mut drones: Query<(Entity, &Position, &Goal, &mut Steering, &mut FlightPhase)>,
) {
    for (entity, position, goal, mut steering, mut phase) in drones.iter_mut() {
        let neighbors = index.neighbors_within(entity, config.perception_range);
        let computed = compute_steering(position.0, goal.0, &neighbors, &obstacles, &config);
        *steering = computed;
        *phase = computed.dominant;
    }
}

//! Collision detection system: records one collision event per frame for a
//! drone that is dangerously close to another drone or inside an obstacle.
//!
//! Inter-drone proximity uses the frame snapshot; the obstacle check uses the
//! integrated position.

use bevy_ecs::prelude::{Entity, Query, Res};

use crate::config::FlockingConfig;
use crate::ecs::{FlightLog, Position};
use crate::obstacles::ObstacleField;
use crate::spatial::SpatialIndex;

pub fn collision_system(
    config: Res<FlockingConfig>,
    index: Res<SpatialIndex>,
    obstacles: Res<ObstacleField>,
    mut drones: Query<(Entity, &Position, &mut FlightLog)>,
) {
    for (entity, position, mut log) in drones.iter_mut() {
        let crowded = !index
            .neighbors_within(entity, config.min_separation_distance)
            .is_empty();
        if crowded || obstacles.check_collision(position.0) {
            log.record_collision();
        }
    }
}

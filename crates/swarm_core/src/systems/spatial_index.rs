//! Spatial index rebuild system: snapshots every drone's position and
//! velocity into the grid at frame start.
//!
//! The snapshot is the frame's canonical pre-integration state; every later
//! stage that needs another drone's state reads it from here, never from the
//! live components.

use bevy_ecs::prelude::{Entity, Query, ResMut};

use crate::ecs::{Position, Velocity};
use crate::spatial::{DroneSample, SpatialIndex};

pub fn rebuild_spatial_index_system(
    mut index: ResMut<SpatialIndex>,
    drones: Query<(Entity, &Position, &Velocity)>,
) {
    index.rebuild(drones.iter().map(|(entity, position, velocity)| DroneSample {
        entity,
        position: position.0,
        velocity: velocity.0,
    }));
}

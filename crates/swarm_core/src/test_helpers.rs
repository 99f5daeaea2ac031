//! Test helpers for common world setup.
//!
//! Shared across unit and integration tests to avoid re-declaring the full
//! resource set in every file.

use bevy_ecs::prelude::World;

use crate::clock::FrameClock;
use crate::config::{FlockingConfig, SpaceBounds};
use crate::directory::DroneDirectory;
use crate::obstacles::ObstacleField;
use crate::profiling::FrameTimings;
use crate::scenario::SwarmRng;
use crate::spatial::SpatialIndex;
use crate::streams::StreamRegistry;
use crate::telemetry::MetricsHistory;

/// Extents used by test worlds, matching the default scenario volume.
pub const TEST_SPACE: (f64, f64, f64) = (50.0, 50.0, 30.0);

/// A minimal world with every core resource, the default configuration, no
/// obstacles, no drones, and a fixed RNG seed.
pub fn create_test_world() -> World {
    create_test_world_with_config(FlockingConfig::default())
}

/// Same as [`create_test_world`] but with a caller-supplied configuration.
///
/// # Panics
///
/// Panics if the configuration is invalid; tests should construct valid
/// configs deliberately.
pub fn create_test_world_with_config(config: FlockingConfig) -> World {
    config.validate().expect("test config should be valid");
    let (x, y, z) = TEST_SPACE;
    let bounds = SpaceBounds::new(x, y, z).expect("test bounds should be valid");

    let mut world = World::new();
    world.insert_resource(FrameClock::default());
    world.insert_resource(config);
    world.insert_resource(bounds);
    world.insert_resource(SpatialIndex::new(config.perception_range));
    world.insert_resource(ObstacleField::default());
    world.insert_resource(DroneDirectory::default());
    world.insert_resource(StreamRegistry::default());
    world.insert_resource(MetricsHistory::default());
    world.insert_resource(FrameTimings::default());
    world.insert_resource(SwarmRng::new(Some(42)));
    world
}

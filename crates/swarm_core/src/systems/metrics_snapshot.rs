//! Metrics capture system: folds the fully integrated frame state into one
//! immutable snapshot and appends it to the history.
//!
//! Neighbor sets come from the frame snapshot; distances are re-measured
//! against integrated positions so the snapshot reflects the state the frame
//! actually produced.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};
use nalgebra::Vector3;

use crate::clock::FrameClock;
use crate::config::FlockingConfig;
use crate::ecs::{FlightLog, MissionType, Position, Velocity};
use crate::spatial::SpatialIndex;
use crate::streams::StreamRegistry;
use crate::telemetry::{collect_metrics, DroneObservation, MetricsHistory};

pub fn capture_metrics_system(
    clock: Res<FrameClock>,
    config: Res<FlockingConfig>,
    index: Res<SpatialIndex>,
    registry: Res<StreamRegistry>,
    mut history: ResMut<MetricsHistory>,
    drones: Query<(Entity, &Position, &Velocity, &MissionType, &FlightLog)>,
) {
    let live: HashMap<Entity, Vector3<f64>> = drones
        .iter()
        .map(|(entity, position, ..)| (entity, position.0))
        .collect();

    let mut observations = Vec::with_capacity(live.len());
    for (entity, position, velocity, mission, log) in drones.iter() {
        let perception = index.neighbors_within(entity, config.perception_range);

        let mut neighbor_distances = Vec::with_capacity(perception.len());
        let mut coordination_positions = Vec::new();
        for neighbor in &perception {
            let Some(&neighbor_position) = live.get(&neighbor.entity) else {
                continue;
            };
            neighbor_distances.push((neighbor_position - position.0).norm());
            if neighbor.distance <= config.coordination_range {
                coordination_positions.push(neighbor_position);
            }
        }

        let mean_neighbor_distance = if neighbor_distances.is_empty() {
            None
        } else {
            Some(neighbor_distances.iter().sum::<f64>() / neighbor_distances.len() as f64)
        };
        let centroid_distance = if coordination_positions.is_empty() {
            None
        } else {
            let centroid = coordination_positions.iter().copied().sum::<Vector3<f64>>()
                / coordination_positions.len() as f64;
            Some((centroid - position.0).norm())
        };

        observations.push(DroneObservation {
            entity,
            mission: *mission,
            speed: velocity.0.norm(),
            goal_progress: log.goal_progress,
            collision_count: log.collision_count,
            mean_neighbor_distance,
            centroid_distance,
        });
    }

    history.push(collect_metrics(
        clock.frame(),
        &observations,
        &registry.sizes,
        config.completion_threshold,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};
    use bevy_ecs::schedule::IntoSystemConfigs;

    use crate::scenario::add_drone;
    use crate::systems::spatial_index::rebuild_spatial_index_system;
    use crate::test_helpers::create_test_world;

    fn run_capture(world: &mut World) {
        world.resource_mut::<FrameClock>().begin_frame(0.1);
        let mut schedule = Schedule::default();
        schedule.add_systems((rebuild_spatial_index_system, capture_metrics_system).chain());
        schedule.run(world);
    }

    #[test]
    fn empty_world_appends_zeroed_metrics() {
        let mut world = create_test_world();
        run_capture(&mut world);

        let history = world.resource::<MetricsHistory>();
        assert_eq!(history.len(), 1);
        let metrics = history.latest().expect("metrics");
        assert_eq!(metrics.frame, 1);
        assert_eq!(metrics.average_speed, 0.0);
        assert_eq!(metrics.average_separation, 0.0);
        assert!(metrics.mission_progress.is_empty());
    }

    #[test]
    fn pair_of_drones_produces_separation_and_speed() {
        let mut world = create_test_world();
        let a = add_drone(
            &mut world,
            "a",
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(40.0, 10.0, 10.0),
            MissionType::Delivery,
        )
        .expect("drone");
        let b = add_drone(
            &mut world,
            "b",
            Vector3::new(14.0, 10.0, 10.0),
            Vector3::new(40.0, 12.0, 10.0),
            MissionType::Delivery,
        )
        .expect("drone");
        world
            .entity_mut(a)
            .insert(Velocity(Vector3::new(1.0, 0.0, 0.0)));
        world
            .entity_mut(b)
            .insert(Velocity(Vector3::new(0.0, 2.0, 0.0)));

        run_capture(&mut world);

        let history = world.resource::<MetricsHistory>();
        let metrics = history.latest().expect("metrics");
        assert!((metrics.average_speed - 1.5).abs() < 1e-9);
        assert!((metrics.average_separation - 4.0).abs() < 1e-9);
        // Each drone's lone neighbor is its pair partner's position, so the
        // centroid distance is the pair distance: cohesion = 1 / (1 + 4).
        assert!((metrics.average_cohesion - 0.2).abs() < 1e-9);
        assert!(metrics.mission_progress.contains_key(&MissionType::Delivery));
    }
}

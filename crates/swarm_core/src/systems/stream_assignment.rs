//! Stream assignment system: reclusters the fleet into traffic streams from
//! the frame snapshot and publishes the stream-size table.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Query, Res, ResMut};

use crate::config::FlockingConfig;
use crate::ecs::{DroneId, StreamMembership};
use crate::spatial::SpatialIndex;
use crate::streams::{assign_streams, StreamRegistry};

pub fn stream_assignment_system(
    config: Res<FlockingConfig>,
    index: Res<SpatialIndex>,
    mut registry: ResMut<StreamRegistry>,
    mut drones: Query<(Entity, &DroneId, &mut StreamMembership)>,
) {
    let ids: HashMap<Entity, DroneId> = drones
        .iter()
        .map(|(entity, id, _)| (entity, id.clone()))
        .collect();
    let assignment = assign_streams(&index, &ids, &config);

    for (entity, _, mut membership) in drones.iter_mut() {
        membership.0 = assignment
            .labels
            .get(&entity)
            .copied()
            .unwrap_or(StreamMembership::NO_STREAM);
    }
    registry.sizes = assignment.sizes;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};
    use bevy_ecs::schedule::IntoSystemConfigs;
    use nalgebra::Vector3;

    use crate::ecs::{MissionType, Velocity};
    use crate::scenario::add_drone;
    use crate::systems::spatial_index::rebuild_spatial_index_system;
    use crate::test_helpers::create_test_world;

    fn run_assignment(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((rebuild_spatial_index_system, stream_assignment_system).chain());
        schedule.run(world);
    }

    fn membership(world: &World, entity: Entity) -> i32 {
        world
            .entity(entity)
            .get::<StreamMembership>()
            .expect("membership")
            .0
    }

    #[test]
    fn close_aligned_pair_forms_stream_zero() {
        let mut world = create_test_world();
        let a = add_drone(
            &mut world,
            "a_0",
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(40.0, 10.0, 10.0),
            MissionType::Delivery,
        )
        .expect("drone");
        let b = add_drone(
            &mut world,
            "a_1",
            Vector3::new(12.0, 10.0, 10.0),
            Vector3::new(40.0, 12.0, 10.0),
            MissionType::Delivery,
        )
        .expect("drone");
        let heading = Velocity(Vector3::new(1.0, 0.1, 0.0));
        world.entity_mut(a).insert(heading);
        world.entity_mut(b).insert(heading);

        run_assignment(&mut world);

        assert_eq!(membership(&world, a), 0);
        assert_eq!(membership(&world, b), 0);
        assert_eq!(world.resource::<StreamRegistry>().sizes[&0], 2);
        assert_eq!(world.resource::<StreamRegistry>().active_streams(), 1);
    }

    #[test]
    fn lone_drone_stays_unassigned() {
        let mut world = create_test_world();
        let solo = add_drone(
            &mut world,
            "solo",
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(40.0, 10.0, 10.0),
            MissionType::Surveillance,
        )
        .expect("drone");

        run_assignment(&mut world);

        assert_eq!(membership(&world, solo), StreamMembership::NO_STREAM);
        assert_eq!(world.resource::<StreamRegistry>().active_streams(), 0);
        assert_eq!(
            world.resource::<StreamRegistry>().sizes[&StreamMembership::NO_STREAM],
            1
        );
    }

    #[test]
    fn reassignment_overwrites_stale_labels() {
        let mut world = create_test_world();
        let a = add_drone(
            &mut world,
            "a_0",
            Vector3::new(10.0, 10.0, 10.0),
            Vector3::new(40.0, 10.0, 10.0),
            MissionType::Delivery,
        )
        .expect("drone");
        let b = add_drone(
            &mut world,
            "a_1",
            Vector3::new(12.0, 10.0, 10.0),
            Vector3::new(40.0, 12.0, 10.0),
            MissionType::Delivery,
        )
        .expect("drone");
        let heading = Velocity(Vector3::new(1.0, 0.0, 0.0));
        world.entity_mut(a).insert(heading);
        world.entity_mut(b).insert(heading);

        run_assignment(&mut world);
        assert_eq!(membership(&world, a), 0);

        // Drift apart; the next pass must dissolve the stream.
        world
            .entity_mut(b)
            .insert(crate::ecs::Position(Vector3::new(30.0, 10.0, 10.0)));
        run_assignment(&mut world);

        assert_eq!(membership(&world, a), StreamMembership::NO_STREAM);
        assert_eq!(membership(&world, b), StreamMembership::NO_STREAM);
        assert_eq!(world.resource::<StreamRegistry>().active_streams(), 0);
    }
}

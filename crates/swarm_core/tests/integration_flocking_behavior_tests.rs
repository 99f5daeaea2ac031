//! Behavioral scenarios: separation pushes close pairs apart, missions make
//! steady progress, obstacle avoidance keeps approaches outside the collision
//! radius, and streams form symmetrically.

use nalgebra::Vector3;
use swarm_core::config::FlockingConfig;
use swarm_core::ecs::{FlightLog, MissionType, Position, StreamMembership, Velocity};
use swarm_core::obstacles::{Obstacle, ObstacleField};
use swarm_core::runner::{simulation_schedule, step_frame};
use swarm_core::scenario::add_drone;
use swarm_core::test_helpers::{create_test_world, create_test_world_with_config};

#[test]
fn separation_pushes_a_close_pair_apart() {
    let mut world = create_test_world();
    let left = add_drone(
        &mut world,
        "left",
        Vector3::new(20.0, 20.0, 15.0),
        Vector3::new(20.0, 20.0, 15.0),
        MissionType::Delivery,
    )
    .expect("drone");
    let right = add_drone(
        &mut world,
        "right",
        Vector3::new(21.0, 20.0, 15.0),
        Vector3::new(21.0, 20.0, 15.0),
        MissionType::Delivery,
    )
    .expect("drone");
    // Identical velocities and goals equal to the start positions: the only
    // asymmetric term along the pair axis is separation.
    world.entity_mut(left).insert(Velocity(Vector3::zeros()));
    world.entity_mut(right).insert(Velocity(Vector3::zeros()));

    let mut schedule = simulation_schedule();
    step_frame(&mut world, &mut schedule, 0.1);

    let left_pos = world.entity(left).get::<Position>().expect("position").0;
    let right_pos = world.entity(right).get::<Position>().expect("position").0;
    let distance = (right_pos - left_pos).norm();
    assert!(
        distance > 1.0,
        "default weights must push the pair apart, got {distance}"
    );
}

#[test]
fn unobstructed_mission_progress_is_strictly_increasing() {
    let mut world = create_test_world();
    let drone = add_drone(
        &mut world,
        "runner",
        Vector3::new(5.0, 25.0, 15.0),
        Vector3::new(15.0, 25.0, 15.0),
        MissionType::Emergency,
    )
    .expect("drone");
    // Remove the spawn jitter so the very first step cannot drift backwards.
    world.entity_mut(drone).insert(Velocity(Vector3::zeros()));

    let mut schedule = simulation_schedule();
    let mut previous = world
        .entity(drone)
        .get::<FlightLog>()
        .expect("log")
        .goal_progress;

    for step in 1..=30 {
        step_frame(&mut world, &mut schedule, 0.1);
        let progress = world
            .entity(drone)
            .get::<FlightLog>()
            .expect("log")
            .goal_progress;
        assert!(
            progress > previous,
            "goal progress stalled at step {step}: {progress} <= {previous}"
        );
        previous = progress;
    }
}

#[test]
fn approach_to_a_shielded_goal_never_collides() {
    // Obstacle avoidance outweighs a gentle mission pull; the speed cap
    // bounds the kinetic energy a drone can carry into the repulsion zone,
    // so the approach stalls outside the collision radius.
    let config = FlockingConfig {
        separation_weight: 0.0,
        alignment_weight: 0.0,
        cohesion_weight: 0.0,
        mission_weight: 0.04,
        obstacle_weight: 2.0,
        max_speed: 0.3,
        max_force: 1.0,
        ..Default::default()
    };
    let mut world = create_test_world_with_config(config);

    let goal = Vector3::new(15.0, 15.0, 15.0);
    world.insert_resource(ObstacleField::new(vec![Obstacle::new(goal, 2.0)]));

    let drone = add_drone(
        &mut world,
        "approacher",
        Vector3::new(5.0, 15.0, 15.0),
        goal,
        MissionType::Delivery,
    )
    .expect("drone");

    let mut schedule = simulation_schedule();
    let mut closest = f64::INFINITY;
    for _ in 0..400 {
        step_frame(&mut world, &mut schedule, 0.05);
        let position = world.entity(drone).get::<Position>().expect("position").0;
        let distance = (position - goal).norm();
        closest = closest.min(distance);
        assert!(
            distance >= 2.0,
            "drone entered the obstacle: distance {distance}"
        );
    }

    assert!(
        closest < 4.0,
        "drone never engaged the obstacle's influence zone: closest {closest}"
    );
    let log = world.entity(drone).get::<FlightLog>().expect("log");
    assert_eq!(log.collision_count, 0);
}

#[test]
fn stream_connection_is_symmetric_and_exclusive() {
    let mut world = create_test_world();
    let a = add_drone(
        &mut world,
        "pair_0",
        Vector3::new(20.0, 20.0, 15.0),
        Vector3::new(45.0, 20.0, 15.0),
        MissionType::Delivery,
    )
    .expect("drone");
    let b = add_drone(
        &mut world,
        "pair_1",
        Vector3::new(23.0, 20.0, 15.0),
        Vector3::new(45.0, 23.0, 15.0),
        MissionType::Delivery,
    )
    .expect("drone");
    let loner = add_drone(
        &mut world,
        "loner",
        Vector3::new(45.0, 45.0, 15.0),
        Vector3::new(5.0, 45.0, 15.0),
        MissionType::Surveillance,
    )
    .expect("drone");
    let heading = Velocity(Vector3::new(1.0, 0.0, 0.0));
    world.entity_mut(a).insert(heading);
    world.entity_mut(b).insert(heading);
    world.entity_mut(loner).insert(heading);

    let mut schedule = simulation_schedule();
    let metrics = step_frame(&mut world, &mut schedule, 0.01);

    let stream_of = |entity| {
        world
            .entity(entity)
            .get::<StreamMembership>()
            .expect("membership")
            .0
    };
    assert_eq!(stream_of(a), stream_of(b), "membership is symmetric");
    assert_eq!(stream_of(a), 0);
    assert_eq!(stream_of(loner), StreamMembership::NO_STREAM);

    assert_eq!(metrics.active_streams, 1);
    assert_eq!(metrics.stream_sizes[&0], 2);
    let labeled: usize = metrics.stream_sizes.values().sum();
    assert_eq!(labeled, 3, "every drone lands in exactly one component");
}

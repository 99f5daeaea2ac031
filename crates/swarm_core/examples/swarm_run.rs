//! Run the default three-mission scenario and print final statistics.
//!
//! Run with: cargo run -p swarm_core --example swarm_run

use bevy_ecs::prelude::World;
use swarm_core::ecs::MissionType;
use swarm_core::profiling::FrameTimings;
use swarm_core::runner::{simulation_schedule, step_frame};
use swarm_core::scenario::{build_scenario, ScenarioParams};
use swarm_core::telemetry::fleet_snapshot;

fn main() {
    const FRAMES: usize = 300;

    let params = ScenarioParams::default()
        .with_seed(123)
        .with_drones_per_mission(5);
    let dt = params.frame_dt;
    let space = params.space_size;

    let mut world = World::new();
    build_scenario(&mut world, params).expect("valid default scenario");

    let mut schedule = simulation_schedule();
    let mut last = None;
    for _ in 0..FRAMES {
        last = Some(step_frame(&mut world, &mut schedule, dt));
    }
    let metrics = last.expect("at least one frame");

    println!(
        "--- Swarm run ({FRAMES} frames, dt {dt}, space {:?}, seed 123) ---",
        space
    );
    println!("Active streams: {}", metrics.active_streams);
    println!("Average speed: {:.2}", metrics.average_speed);
    println!("Average separation: {:.2}", metrics.average_separation);
    println!("Collision events: {}", metrics.collision_events);

    for mission in MissionType::ALL {
        let progress = metrics
            .mission_progress
            .get(&mission)
            .copied()
            .unwrap_or(0.0);
        let completion = metrics
            .mission_completion_rates
            .get(&mission)
            .copied()
            .unwrap_or(0.0);
        println!(
            "{:<13} progress {:>6.1}%  completion {:>5.1}%",
            mission.label(),
            progress * 100.0,
            completion * 100.0
        );
    }

    let timings = world.resource::<FrameTimings>();
    println!(
        "Frame time: avg {:?}, max {:?} over {} frames",
        timings.average(),
        timings.max(),
        timings.frames()
    );

    println!("\nFinal drone states:");
    for snapshot in fleet_snapshot(&mut world) {
        println!(
            "  {:<16} stream {:>2}  progress {:>6.1}%  traveled {:>6.1}  collisions {}",
            snapshot.id.as_str(),
            snapshot.stream_id,
            snapshot.goal_progress * 100.0,
            snapshot.distance_traveled,
            snapshot.collision_count,
        );
    }
}

//! Frame runner: builds the fixed pipeline schedule and advances the world
//! one frame at a time.
//!
//! Stage order per frame: rebuild spatial index → steering → movement →
//! collision detection → stream assignment → metrics capture. The chain is a
//! hard ordering: every steering computation reads the pre-step snapshot and
//! all writes land in the movement stage, so the update is synchronous
//! (Jacobi) rather than sweep-order dependent.

use std::time::Instant;

use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::FrameClock;
use crate::profiling::FrameTimings;
use crate::systems::{
    collision::collision_system, metrics_snapshot::capture_metrics_system,
    movement::movement_system, spatial_index::rebuild_spatial_index_system,
    steering::steering_system, stream_assignment::stream_assignment_system,
};
use crate::telemetry::{MetricsHistory, SimulationMetrics};

/// Build the per-frame pipeline schedule.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            rebuild_spatial_index_system,
            steering_system,
            movement_system,
            collision_system,
            stream_assignment_system,
            capture_metrics_system,
        )
            .chain(),
    );
    schedule
}

/// Advance the world by one frame of `dt` simulation seconds and return the
/// frame's metrics.
///
/// Frame boundaries are the only safe suspension points; a frame is never
/// partially applied.
pub fn step_frame(world: &mut World, schedule: &mut Schedule, dt: f64) -> SimulationMetrics {
    let started = Instant::now();
    world.resource_mut::<FrameClock>().begin_frame(dt);
    schedule.run(world);
    if let Some(mut timings) = world.get_resource_mut::<FrameTimings>() {
        timings.record(started.elapsed());
    }
    world
        .resource::<MetricsHistory>()
        .latest()
        .expect("metrics capture appends one snapshot per frame")
        .clone()
}

/// Run `frames` fixed-dt frames. Returns the number of frames executed.
pub fn run_frames(world: &mut World, schedule: &mut Schedule, frames: usize, dt: f64) -> usize {
    for _ in 0..frames {
        step_frame(world, schedule, dt);
    }
    frames
}

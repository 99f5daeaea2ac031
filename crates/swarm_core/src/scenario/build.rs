use bevy_ecs::prelude::{Entity, Resource, World};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::FrameClock;
use crate::config::SpaceBounds;
use crate::directory::DroneDirectory;
use crate::ecs::{
    DroneId, FlightLog, FlightPhase, Goal, MissionType, PathHistory, Position, StreamMembership,
    Steering, Velocity,
};
use crate::error::SwarmError;
use crate::obstacles::{Obstacle, ObstacleField};
use crate::profiling::FrameTimings;
use crate::spatial::SpatialIndex;
use crate::streams::StreamRegistry;
use crate::telemetry::MetricsHistory;

use super::params::ScenarioParams;

/// Obstacles are placed inside the central portion of each extent so walls
/// stay clear for spawn regions.
const OBSTACLE_MARGIN_FRACTION: f64 = 0.2;
const OBSTACLE_MIN_RADIUS: f64 = 2.0;
const OBSTACLE_MAX_RADIUS: f64 = 4.0;

/// Per-drone placement scatter around the mission region anchors.
const SPAWN_SCATTER: f64 = 5.0;

/// Magnitude bound of the initial velocity jitter.
const JITTER: f64 = 0.1;

/// World RNG for scenario placement and spawn jitter.
#[derive(Resource)]
pub struct SwarmRng(pub StdRng);

impl SwarmRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self(rng)
    }
}

/// Mission-specific start/goal anchors as fractions of the space extents.
fn mission_regions(mission: MissionType) -> (Vector3<f64>, Vector3<f64>) {
    match mission {
        MissionType::Delivery => (
            Vector3::new(0.2, 0.2, 0.5),
            Vector3::new(0.8, 0.8, 0.5),
        ),
        MissionType::Surveillance => (
            Vector3::new(0.8, 0.2, 0.3),
            Vector3::new(0.2, 0.8, 0.7),
        ),
        MissionType::Emergency => (
            Vector3::new(0.5, 0.1, 0.4),
            Vector3::new(0.5, 0.9, 0.6),
        ),
    }
}

/// Randomly place `count` spherical obstacles inside the central volume.
pub fn generate_obstacles(rng: &mut StdRng, bounds: &SpaceBounds, count: usize) -> Vec<Obstacle> {
    let extents = bounds.extents();
    (0..count)
        .map(|_| {
            let position = Vector3::new(
                rng.gen_range(OBSTACLE_MARGIN_FRACTION * extents.x..=(1.0 - OBSTACLE_MARGIN_FRACTION) * extents.x),
                rng.gen_range(OBSTACLE_MARGIN_FRACTION * extents.y..=(1.0 - OBSTACLE_MARGIN_FRACTION) * extents.y),
                rng.gen_range(OBSTACLE_MARGIN_FRACTION * extents.z..=(1.0 - OBSTACLE_MARGIN_FRACTION) * extents.z),
            );
            let radius = rng.gen_range(OBSTACLE_MIN_RADIUS..=OBSTACLE_MAX_RADIUS);
            Obstacle::new(position, radius)
        })
        .collect()
}

fn initial_jitter(rng: &mut StdRng) -> Vector3<f64> {
    let jitter = Vector3::new(
        rng.gen_range(-JITTER..=JITTER),
        rng.gen_range(-JITTER..=JITTER),
        rng.gen_range(-JITTER..=JITTER),
    );
    // A drone needs a defined heading from frame one.
    if jitter.norm() <= 1e-9 {
        Vector3::new(JITTER / 2.0, 0.0, 0.0)
    } else {
        jitter
    }
}

/// Register a drone in the world.
///
/// Fails on id reuse. Start and goal are clamped into the space bounds; the
/// initial velocity is a small nonzero jitter and the path history opens with
/// the start position.
pub fn add_drone(
    world: &mut World,
    id: impl Into<String>,
    position: Vector3<f64>,
    goal: Vector3<f64>,
    mission: MissionType,
) -> Result<Entity, SwarmError> {
    let id = DroneId(id.into());
    if world.resource::<DroneDirectory>().contains(&id) {
        return Err(SwarmError::DuplicateDroneId(id.0));
    }

    let bounds = *world.resource::<SpaceBounds>();
    let position = bounds.clamp(position);
    let goal = bounds.clamp(goal);
    let velocity = initial_jitter(&mut world.resource_mut::<SwarmRng>().0);
    let initial_goal_distance = (goal - position).norm();

    let entity = world
        .spawn((
            id.clone(),
            mission,
            Position(position),
            Velocity(velocity),
            Goal(goal),
            PathHistory::new(position),
            FlightLog::new(initial_goal_distance),
            FlightPhase::Separation,
            StreamMembership::unassigned(),
            Steering::default(),
        ))
        .id();
    world.resource_mut::<DroneDirectory>().insert(id, entity);
    Ok(entity)
}

/// Spawn `drones_per_mission` drones for each mission type, scattered around
/// that mission's start region and aimed at its goal region.
fn spawn_mission_fleets(world: &mut World, params: &ScenarioParams) -> Result<(), SwarmError> {
    let extents = world.resource::<SpaceBounds>().extents();
    for mission in MissionType::ALL {
        let (start_anchor, goal_anchor) = mission_regions(mission);
        for i in 0..params.drones_per_mission {
            let offset = {
                let mut rng = world.resource_mut::<SwarmRng>();
                Vector3::new(
                    (rng.0.gen::<f64>() - 0.5) * SPAWN_SCATTER,
                    (rng.0.gen::<f64>() - 0.5) * SPAWN_SCATTER,
                    (rng.0.gen::<f64>() - 0.5) * SPAWN_SCATTER,
                )
            };
            let start = start_anchor.component_mul(&extents) + offset;
            let goal = goal_anchor.component_mul(&extents) + offset;
            add_drone(
                world,
                format!("{}_{i}", mission.label()),
                start,
                goal,
                mission,
            )?;
        }
    }
    Ok(())
}

/// Validate the configuration and populate the world: resources, obstacles,
/// and the per-mission demo fleets.
pub fn build_scenario(world: &mut World, params: ScenarioParams) -> Result<(), SwarmError> {
    params.config.validate()?;
    if !(params.frame_dt > 0.0) {
        return Err(SwarmError::InvalidConfiguration(format!(
            "frame_dt must be positive, got {}",
            params.frame_dt
        )));
    }
    let (x, y, z) = params.space_size;
    let bounds = SpaceBounds::new(x, y, z)?;

    let mut rng = SwarmRng::new(params.seed);
    let obstacles = generate_obstacles(&mut rng.0, &bounds, params.num_obstacles);

    world.insert_resource(FrameClock::default());
    world.insert_resource(params.config);
    world.insert_resource(bounds);
    world.insert_resource(SpatialIndex::new(params.config.perception_range));
    world.insert_resource(ObstacleField::new(obstacles));
    world.insert_resource(DroneDirectory::default());
    world.insert_resource(StreamRegistry::default());
    world.insert_resource(MetricsHistory::default());
    world.insert_resource(FrameTimings::default());
    world.insert_resource(rng);

    spawn_mission_fleets(world, &params)
}

//! Metrics snapshots and fleet state exposure.
//!
//! One immutable [`SimulationMetrics`] value is produced per frame and
//! appended to [`MetricsHistory`]. Export and plotting collaborators consume
//! the history and [`fleet_snapshot`]; nothing here mutates drone state.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource, World};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ecs::{
    DroneId, FlightLog, FlightPhase, Goal, MissionType, PathHistory, Position, StreamMembership,
    Velocity,
};

/// Immutable aggregate snapshot of one fully integrated frame.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationMetrics {
    pub timestamp: DateTime<Utc>,
    pub frame: u64,
    pub active_streams: usize,
    pub average_separation: f64,
    pub average_speed: f64,
    pub mission_progress: HashMap<MissionType, f64>,
    pub stream_sizes: HashMap<i32, usize>,
    pub collision_events: u64,
    pub mission_completion_rates: HashMap<MissionType, f64>,
    pub average_cohesion: f64,
}

/// Append-only per-frame metrics log.
#[derive(Debug, Default, Resource)]
pub struct MetricsHistory {
    history: Vec<SimulationMetrics>,
}

impl MetricsHistory {
    pub fn push(&mut self, metrics: SimulationMetrics) {
        self.history.push(metrics);
    }

    pub fn latest(&self) -> Option<&SimulationMetrics> {
        self.history.last()
    }

    pub fn all(&self) -> &[SimulationMetrics] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Per-drone input row for the metrics collector, measured from the
/// integrated frame state.
#[derive(Debug, Clone)]
pub struct DroneObservation {
    pub entity: Entity,
    pub mission: MissionType,
    pub speed: f64,
    pub goal_progress: f64,
    pub collision_count: u64,
    /// Mean distance to perception-range neighbors; `None` when isolated.
    pub mean_neighbor_distance: Option<f64>,
    /// Distance to the centroid of coordination-range neighbors; `None`
    /// when there are none.
    pub centroid_distance: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Build the frame's metrics value. Pure over its inputs; every average over
/// an empty set is 0.0.
pub fn collect_metrics(
    frame: u64,
    observations: &[DroneObservation],
    stream_sizes: &HashMap<i32, usize>,
    completion_threshold: f64,
) -> SimulationMetrics {
    let average_separation = mean(
        observations
            .iter()
            .filter_map(|o| o.mean_neighbor_distance),
    );
    let average_speed = mean(observations.iter().map(|o| o.speed));
    // Cohesion is reported as 1 / (1 + d) so a tight cluster approaches 1
    // and the value stays finite for coincident drones.
    let average_cohesion = mean(
        observations
            .iter()
            .filter_map(|o| o.centroid_distance)
            .map(|d| 1.0 / (1.0 + d)),
    );

    let mut mission_progress = HashMap::new();
    let mut mission_completion_rates = HashMap::new();
    for mission in MissionType::ALL {
        let of_mission: Vec<&DroneObservation> = observations
            .iter()
            .filter(|o| o.mission == mission)
            .collect();
        if of_mission.is_empty() {
            continue;
        }
        mission_progress.insert(
            mission,
            mean(of_mission.iter().map(|o| o.goal_progress)),
        );
        let completed = of_mission
            .iter()
            .filter(|o| o.goal_progress >= completion_threshold)
            .count();
        mission_completion_rates.insert(mission, completed as f64 / of_mission.len() as f64);
    }

    let active_streams = stream_sizes
        .keys()
        .filter(|&&id| id != StreamMembership::NO_STREAM)
        .count();

    SimulationMetrics {
        timestamp: Utc::now(),
        frame,
        active_streams,
        average_separation,
        average_speed,
        mission_progress,
        stream_sizes: stream_sizes.clone(),
        collision_events: observations.iter().map(|o| o.collision_count).sum(),
        mission_completion_rates,
        average_cohesion,
    }
}

/// Snapshot of one drone for visualization/export.
#[derive(Debug, Clone, Serialize)]
pub struct DroneSnapshot {
    pub id: DroneId,
    pub mission: MissionType,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub goal: [f64; 3],
    pub stream_id: i32,
    pub phase: FlightPhase,
    pub distance_traveled: f64,
    pub goal_progress: f64,
    pub collision_count: u64,
    pub path_history: Vec<[f64; 3]>,
}

/// Snapshot every drone in the world, sorted by id.
pub fn fleet_snapshot(world: &mut World) -> Vec<DroneSnapshot> {
    let mut snapshots: Vec<DroneSnapshot> = world
        .query::<(
            &DroneId,
            &MissionType,
            &Position,
            &Velocity,
            &Goal,
            &StreamMembership,
            &FlightPhase,
            &FlightLog,
            &PathHistory,
        )>()
        .iter(world)
        .map(
            |(id, mission, position, velocity, goal, stream, phase, log, history)| DroneSnapshot {
                id: id.clone(),
                mission: *mission,
                position: position.0.into(),
                velocity: velocity.0.into(),
                goal: goal.0.into(),
                stream_id: stream.0,
                phase: *phase,
                distance_traveled: log.distance_traveled,
                goal_progress: log.goal_progress,
                collision_count: log.collision_count,
                path_history: history.iter().map(|p| (*p).into()).collect(),
            },
        )
        .collect();
    snapshots.sort_by(|a, b| a.id.cmp(&b.id));
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(mission: MissionType, progress: f64) -> DroneObservation {
        DroneObservation {
            entity: Entity::from_raw(0),
            mission,
            speed: 1.0,
            goal_progress: progress,
            collision_count: 0,
            mean_neighbor_distance: None,
            centroid_distance: None,
        }
    }

    #[test]
    fn empty_world_metrics_are_zeroed() {
        let metrics = collect_metrics(7, &[], &HashMap::new(), 0.95);
        assert_eq!(metrics.frame, 7);
        assert_eq!(metrics.active_streams, 0);
        assert_eq!(metrics.average_separation, 0.0);
        assert_eq!(metrics.average_speed, 0.0);
        assert_eq!(metrics.average_cohesion, 0.0);
        assert_eq!(metrics.collision_events, 0);
        assert!(metrics.mission_progress.is_empty());
        assert!(metrics.mission_completion_rates.is_empty());
        assert!(metrics.stream_sizes.is_empty());
    }

    #[test]
    fn mission_aggregates_group_by_mission_type() {
        let observations = vec![
            observation(MissionType::Delivery, 1.0),
            observation(MissionType::Delivery, 0.5),
            observation(MissionType::Emergency, 0.2),
        ];
        let metrics = collect_metrics(1, &observations, &HashMap::new(), 0.95);

        assert!((metrics.mission_progress[&MissionType::Delivery] - 0.75).abs() < 1e-12);
        assert!((metrics.mission_progress[&MissionType::Emergency] - 0.2).abs() < 1e-12);
        assert!(!metrics
            .mission_progress
            .contains_key(&MissionType::Surveillance));

        assert!(
            (metrics.mission_completion_rates[&MissionType::Delivery] - 0.5).abs() < 1e-12,
            "one of two delivery drones is past the threshold"
        );
        assert_eq!(metrics.mission_completion_rates[&MissionType::Emergency], 0.0);
    }

    #[test]
    fn separation_and_cohesion_ignore_isolated_drones() {
        let mut with_neighbors = observation(MissionType::Delivery, 0.0);
        with_neighbors.mean_neighbor_distance = Some(4.0);
        with_neighbors.centroid_distance = Some(1.0);
        let isolated = observation(MissionType::Delivery, 0.0);

        let metrics = collect_metrics(1, &[with_neighbors, isolated], &HashMap::new(), 0.95);
        assert!((metrics.average_separation - 4.0).abs() < 1e-12);
        assert!((metrics.average_cohesion - 0.5).abs() < 1e-12);
    }

    #[test]
    fn active_streams_exclude_the_unassigned_pool() {
        let mut sizes = HashMap::new();
        sizes.insert(0, 3);
        sizes.insert(1, 2);
        sizes.insert(StreamMembership::NO_STREAM, 4);

        let metrics = collect_metrics(1, &[], &sizes, 0.95);
        assert_eq!(metrics.active_streams, 2);
        assert_eq!(metrics.stream_sizes[&StreamMembership::NO_STREAM], 4);
    }

    #[test]
    fn metrics_serialize_for_export() {
        let mut sizes = HashMap::new();
        sizes.insert(0, 2);
        let metrics = collect_metrics(
            3,
            &[observation(MissionType::Surveillance, 1.0)],
            &sizes,
            0.95,
        );

        let json = serde_json::to_value(&metrics).expect("serializable");
        assert_eq!(json["frame"], 3);
        assert_eq!(json["mission_progress"]["surveillance"], 1.0);
        assert_eq!(json["stream_sizes"]["0"], 2);
    }

    #[test]
    fn history_appends_in_order() {
        let mut history = MetricsHistory::default();
        assert!(history.latest().is_none());

        history.push(collect_metrics(1, &[], &HashMap::new(), 0.95));
        history.push(collect_metrics(2, &[], &HashMap::new(), 0.95));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|m| m.frame), Some(2));
        assert_eq!(history.all()[0].frame, 1);
    }
}

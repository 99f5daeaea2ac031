//! Drone components.
//!
//! A drone entity carries: identity ([`DroneId`], [`MissionType`]), motion
//! state ([`Position`], [`Velocity`], [`Goal`]), bookkeeping ([`PathHistory`],
//! [`FlightLog`]), and per-frame outputs ([`Steering`], [`FlightPhase`],
//! [`StreamMembership`]).

use std::collections::VecDeque;

use bevy_ecs::prelude::Component;
use nalgebra::Vector3;
use serde::Serialize;

/// Caller-supplied stable identifier, unique per world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Component, Serialize)]
pub struct DroneId(pub String);

impl DroneId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mission class. Affects initial placement only, never steering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionType {
    Delivery,
    Surveillance,
    Emergency,
}

impl MissionType {
    pub const ALL: [MissionType; 3] = [
        MissionType::Delivery,
        MissionType::Surveillance,
        MissionType::Emergency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MissionType::Delivery => "delivery",
            MissionType::Surveillance => "surveillance",
            MissionType::Emergency => "emergency",
        }
    }
}

/// Which steering term dominated the drone's last frame. Diagnostic label
/// consumed by external renderers for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    Separation,
    Alignment,
    Cohesion,
    Mission,
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Position(pub Vector3<f64>);

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Velocity(pub Vector3<f64>);

/// Fixed mission target for the drone.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Goal(pub Vector3<f64>);

/// Ring buffer of past positions, oldest evicted first. Never empty: the
/// spawn position is recorded at creation.
#[derive(Debug, Clone, Component)]
pub struct PathHistory {
    points: VecDeque<Vector3<f64>>,
}

impl PathHistory {
    pub const CAPACITY: usize = 50;

    pub fn new(initial: Vector3<f64>) -> Self {
        let mut points = VecDeque::with_capacity(Self::CAPACITY);
        points.push_back(initial);
        Self { points }
    }

    pub fn push(&mut self, point: Vector3<f64>) {
        if self.points.len() == Self::CAPACITY {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn oldest(&self) -> Vector3<f64> {
        *self.points.front().expect("path history is never empty")
    }

    pub fn latest(&self) -> Vector3<f64> {
        *self.points.back().expect("path history is never empty")
    }

    /// Oldest-first iteration over the retained positions.
    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.points.iter()
    }
}

/// Cumulative flight bookkeeping.
///
/// `initial_goal_distance` is captured once at spawn and never updated; it is
/// the fixed reference for goal progress even after the path ring has evicted
/// the spawn position.
#[derive(Debug, Clone, Copy, Component)]
pub struct FlightLog {
    pub distance_traveled: f64,
    pub goal_progress: f64,
    pub collision_count: u64,
    initial_goal_distance: f64,
}

impl FlightLog {
    pub fn new(initial_goal_distance: f64) -> Self {
        Self {
            distance_traveled: 0.0,
            goal_progress: 0.0,
            collision_count: 0,
            initial_goal_distance,
        }
    }

    /// Recompute goal progress from the current distance to goal.
    ///
    /// A drone spawned on its goal has no meaningful progress fraction; the
    /// division-by-zero guard pins it to 0.
    pub fn update_progress(&mut self, current_goal_distance: f64) {
        if self.initial_goal_distance > f64::EPSILON {
            self.goal_progress =
                (self.initial_goal_distance - current_goal_distance) / self.initial_goal_distance;
        } else {
            self.goal_progress = 0.0;
        }
    }

    pub fn record_collision(&mut self) {
        self.collision_count += 1;
    }
}

/// Stream label. [`StreamMembership::NO_STREAM`] marks a drone outside any
/// stream; other values identify a cluster within the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct StreamMembership(pub i32);

impl StreamMembership {
    pub const NO_STREAM: i32 = -1;

    pub fn unassigned() -> Self {
        Self(Self::NO_STREAM)
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != Self::NO_STREAM
    }
}

/// Per-frame steering output: blended acceleration plus the dominant term's
/// phase label. Written by the steering system, consumed by movement.
#[derive(Debug, Clone, Copy, Component)]
pub struct Steering {
    pub acceleration: Vector3<f64>,
    pub dominant: FlightPhase,
}

impl Default for Steering {
    fn default() -> Self {
        Self {
            acceleration: Vector3::zeros(),
            dominant: FlightPhase::Separation,
        }
    }
}

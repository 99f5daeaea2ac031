//! Steering force computation: separation, alignment, cohesion, mission,
//! and obstacle avoidance, blended under configured weights and clamped to
//! the force limit.
//!
//! All functions are pure over the frame's neighbor snapshot; the steering
//! system threads the snapshot through per drone.

use nalgebra::Vector3;

use crate::config::FlockingConfig;
use crate::ecs::{FlightPhase, Steering};
use crate::obstacles::ObstacleField;
use crate::spatial::Neighbor;

/// Scale a vector down so its magnitude does not exceed `max`.
pub fn clamp_magnitude(v: Vector3<f64>, max: f64) -> Vector3<f64> {
    let norm = v.norm();
    if norm > max {
        v * (max / norm)
    } else {
        v
    }
}

/// Inverse-square repulsion from neighbors inside the separation range.
///
/// A coincident neighbor (distance 0) has no away-direction; it contributes
/// a unit repulsion along +X so dense spawns still disperse deterministically.
pub fn separation_force(
    position: Vector3<f64>,
    neighbors: &[Neighbor],
    separation_range: f64,
) -> Vector3<f64> {
    let mut force = Vector3::zeros();
    for neighbor in neighbors.iter().filter(|n| n.distance <= separation_range) {
        if neighbor.distance > 0.0 {
            force += (position - neighbor.position) / (neighbor.distance * neighbor.distance);
        } else {
            force += Vector3::x();
        }
    }
    force
}

/// Average velocity of neighbors inside the coordination range; zero when
/// there are none.
pub fn alignment_force(neighbors: &[Neighbor], coordination_range: f64) -> Vector3<f64> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for neighbor in neighbors.iter().filter(|n| n.distance <= coordination_range) {
        sum += neighbor.velocity;
        count += 1;
    }
    if count == 0 {
        Vector3::zeros()
    } else {
        sum / count as f64
    }
}

/// Pull toward the centroid of neighbors inside the coordination range; zero
/// when there are none.
pub fn cohesion_force(
    position: Vector3<f64>,
    neighbors: &[Neighbor],
    coordination_range: f64,
) -> Vector3<f64> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for neighbor in neighbors.iter().filter(|n| n.distance <= coordination_range) {
        sum += neighbor.position;
        count += 1;
    }
    if count == 0 {
        Vector3::zeros()
    } else {
        sum / count as f64 - position
    }
}

/// Goal-seeking steering at full speed; zero when already on the goal.
pub fn mission_force(position: Vector3<f64>, goal: Vector3<f64>, max_speed: f64) -> Vector3<f64> {
    match (goal - position).try_normalize(f64::EPSILON) {
        Some(direction) => direction * max_speed,
        None => Vector3::zeros(),
    }
}

/// Blend the five weighted terms, clamp to `max_force`, and classify the
/// dominant term.
///
/// Tie priority: obstacle > separation > mission > alignment > cohesion.
/// The phase label set is closed to four values, so an obstacle-dominant
/// frame reports `Separation` (both occupy the safety-critical slot).
pub fn compute_steering(
    position: Vector3<f64>,
    goal: Vector3<f64>,
    neighbors: &[Neighbor],
    obstacles: &ObstacleField,
    config: &FlockingConfig,
) -> Steering {
    let separation =
        separation_force(position, neighbors, config.separation_range) * config.separation_weight;
    let alignment =
        alignment_force(neighbors, config.coordination_range) * config.alignment_weight;
    let cohesion =
        cohesion_force(position, neighbors, config.coordination_range) * config.cohesion_weight;
    let mission = mission_force(position, goal, config.max_speed) * config.mission_weight;
    let obstacle = obstacles.avoidance_force(position, config.max_speed) * config.obstacle_weight;

    // Priority order; a later term must be strictly larger to take over.
    let ranked = [
        (FlightPhase::Separation, obstacle),
        (FlightPhase::Separation, separation),
        (FlightPhase::Mission, mission),
        (FlightPhase::Alignment, alignment),
        (FlightPhase::Cohesion, cohesion),
    ];
    let mut dominant = ranked[0].0;
    let mut dominant_norm = ranked[0].1.norm();
    for (phase, term) in &ranked[1..] {
        let norm = term.norm();
        if norm > dominant_norm {
            dominant = *phase;
            dominant_norm = norm;
        }
    }

    let total = separation + alignment + cohesion + mission + obstacle;
    Steering {
        acceleration: clamp_magnitude(total, config.max_force),
        dominant,
    }
}

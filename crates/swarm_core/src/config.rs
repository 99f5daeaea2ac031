//! Flocking configuration and world bounds.
//!
//! All tunables live in [`FlockingConfig`], inserted as a resource once per
//! world. Validation happens up front — a config that passes
//! [`FlockingConfig::validate`] cannot fail mid-run.

use bevy_ecs::prelude::Resource;
use nalgebra::Vector3;

use crate::error::SwarmError;

/// Steering weights, interaction ranges, and motion limits for the swarm.
///
/// Defaults match the reference tuning: separation dominates at close range,
/// mission-seeking and obstacle avoidance outweigh the grouping terms.
#[derive(Debug, Clone, Copy, Resource)]
pub struct FlockingConfig {
    /// Neighbors closer than this repel (squared-falloff).
    pub separation_range: f64,
    /// Neighbors within this range contribute to alignment and cohesion.
    pub coordination_range: f64,
    /// Outer radius of the per-frame neighbor query.
    pub perception_range: f64,
    pub separation_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    pub mission_weight: f64,
    pub obstacle_weight: f64,
    /// Velocity magnitude cap, enforced after every integration step.
    pub max_speed: f64,
    /// Cap on the blended steering acceleration magnitude.
    pub max_force: f64,
    /// Two drones closer than this can be stream-connected.
    pub stream_formation_distance: f64,
    /// Minimum cosine similarity between velocities for stream connection.
    pub stream_alignment_cosine: f64,
    /// Inter-drone distance below which a collision event is recorded.
    pub min_separation_distance: f64,
    /// Drones at or above this goal progress count as mission-complete.
    pub completion_threshold: f64,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            separation_range: 3.0,
            coordination_range: 10.0,
            perception_range: 20.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 0.8,
            mission_weight: 1.2,
            obstacle_weight: 2.0,
            max_speed: 2.0,
            max_force: 1.0,
            stream_formation_distance: 5.0,
            stream_alignment_cosine: std::f64::consts::FRAC_1_SQRT_2,
            min_separation_distance: 0.5,
            completion_threshold: 0.95,
        }
    }
}

impl FlockingConfig {
    /// Check range ordering, positivity of limits, and weight signs.
    pub fn validate(&self) -> Result<(), SwarmError> {
        let positive = [
            ("separation_range", self.separation_range),
            ("coordination_range", self.coordination_range),
            ("perception_range", self.perception_range),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("stream_formation_distance", self.stream_formation_distance),
            ("min_separation_distance", self.min_separation_distance),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SwarmError::InvalidConfiguration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let weights = [
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("mission_weight", self.mission_weight),
            ("obstacle_weight", self.obstacle_weight),
        ];
        for (name, value) in weights {
            if !(value >= 0.0) {
                return Err(SwarmError::InvalidConfiguration(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if self.separation_range > self.coordination_range {
            return Err(SwarmError::InvalidConfiguration(format!(
                "separation_range ({}) must not exceed coordination_range ({})",
                self.separation_range, self.coordination_range
            )));
        }
        if self.coordination_range > self.perception_range {
            return Err(SwarmError::InvalidConfiguration(format!(
                "coordination_range ({}) must not exceed perception_range ({})",
                self.coordination_range, self.perception_range
            )));
        }
        if !(-1.0..=1.0).contains(&self.stream_alignment_cosine) {
            return Err(SwarmError::InvalidConfiguration(format!(
                "stream_alignment_cosine must be a cosine in [-1, 1], got {}",
                self.stream_alignment_cosine
            )));
        }
        if !(0.0..=1.0).contains(&self.completion_threshold) {
            return Err(SwarmError::InvalidConfiguration(format!(
                "completion_threshold must be in [0, 1], got {}",
                self.completion_threshold
            )));
        }
        Ok(())
    }
}

/// Axis-aligned simulation volume `[0, x] x [0, y] x [0, z]`.
///
/// The boundary is a hard wall: positions are clamped per axis, velocity is
/// left untouched (accepted wall-contact policy).
#[derive(Debug, Clone, Copy, Resource)]
pub struct SpaceBounds {
    extents: Vector3<f64>,
}

impl SpaceBounds {
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, SwarmError> {
        if !(x > 0.0 && y > 0.0 && z > 0.0) {
            return Err(SwarmError::InvalidConfiguration(format!(
                "space extents must be positive, got ({x}, {y}, {z})"
            )));
        }
        Ok(Self {
            extents: Vector3::new(x, y, z),
        })
    }

    pub fn extents(&self) -> Vector3<f64> {
        self.extents
    }

    /// Clamp a point into the volume, axis by axis.
    pub fn clamp(&self, point: Vector3<f64>) -> Vector3<f64> {
        Vector3::new(
            point.x.clamp(0.0, self.extents.x),
            point.y.clamp(0.0, self.extents.y),
            point.z.clamp(0.0, self.extents.z),
        )
    }

    pub fn contains(&self, point: Vector3<f64>) -> bool {
        (0.0..=self.extents.x).contains(&point.x)
            && (0.0..=self.extents.y).contains(&point.y)
            && (0.0..=self.extents.z).contains(&point.z)
    }
}

//! Static spherical obstacles and their repulsive field.

use bevy_ecs::prelude::Resource;
use nalgebra::Vector3;

/// A spherical obstacle, immutable after creation. The repulsive field
/// extends to twice the collision radius.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    position: Vector3<f64>,
    radius: f64,
    influence_radius: f64,
}

impl Obstacle {
    pub fn new(position: Vector3<f64>, radius: f64) -> Self {
        Self {
            position,
            radius,
            influence_radius: radius * 2.0,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn influence_radius(&self) -> f64 {
        self.influence_radius
    }

    pub fn contains(&self, point: Vector3<f64>) -> bool {
        (point - self.position).norm() < self.radius
    }

    /// Repulsion away from the obstacle center, quadratic in proximity and
    /// scaled to `max_speed`. Zero outside the influence radius, and zero at
    /// the exact center where no away-direction exists.
    pub fn avoidance_force(&self, position: Vector3<f64>, max_speed: f64) -> Vector3<f64> {
        let away = position - self.position;
        let distance = away.norm();

        if distance < self.influence_radius && distance > 0.0 {
            let strength = (1.0 - distance / self.influence_radius).powi(2);
            (away / distance) * strength * max_speed
        } else {
            Vector3::zeros()
        }
    }
}

/// All obstacles in the world. Populated at setup, never mutated afterwards.
#[derive(Debug, Default, Resource)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// True when the position is strictly inside any obstacle.
    pub fn check_collision(&self, position: Vector3<f64>) -> bool {
        self.obstacles.iter().any(|o| o.contains(position))
    }

    /// Summed avoidance contribution of every obstacle whose influence
    /// reaches the position. Unclamped; the steering blend applies the
    /// force cap.
    pub fn avoidance_force(&self, position: Vector3<f64>, max_speed: f64) -> Vector3<f64> {
        self.obstacles
            .iter()
            .map(|o| o.avoidance_force(position, max_speed))
            .sum()
    }
}

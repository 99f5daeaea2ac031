//! Movement system: integrates the frame's steering output into velocity and
//! position, then updates per-drone bookkeeping.
//!
//! Runs after every steering computation has finished, so all writes apply to
//! a consistently pre-step world. The boundary is a hard wall: positions are
//! clamped per axis while velocity is left untouched (accepted edge-case
//! policy for wall contact).

use bevy_ecs::prelude::{Query, Res};

use crate::clock::FrameClock;
use crate::config::{FlockingConfig, SpaceBounds};
use crate::ecs::{FlightLog, Goal, PathHistory, Position, Steering, Velocity};
use crate::steering::clamp_magnitude;

#[allow(clippy::type_complexity)]
pub fn movement_system(
    clock: Res<FrameClock>,
    config: Res<FlockingConfig>,
    bounds: Res<SpaceBounds>,
    mut drones: Query<(
        &mut Position,
        &mut Velocity,
        &Goal,
        &mut PathHistory,
        &mut FlightLog,
        &Steering,
    )>,
) {
    let dt = clock.dt();
    for (mut position, mut velocity, goal, mut history, mut log, steering) in drones.iter_mut() {
        velocity.0 += steering.acceleration * dt;
        velocity.0 = clamp_magnitude(velocity.0, config.max_speed);

        position.0 += velocity.0 * dt;
        position.0 = bounds.clamp(position.0);

        history.push(position.0);
        log.distance_traveled += velocity.0.norm() * dt;
        log.update_progress((goal.0 - position.0).norm());
    }
}

//! Scenario setup: world construction, drone registration, and randomized
//! demo placement.

mod build;
mod params;

pub use build::{add_drone, build_scenario, generate_obstacles, SwarmRng};
pub use params::ScenarioParams;

pub mod clock;
pub mod config;
pub mod directory;
pub mod ecs;
pub mod error;
pub mod obstacles;
pub mod profiling;
pub mod runner;
pub mod scenario;
pub mod spatial;
pub mod steering;
pub mod streams;
pub mod systems;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

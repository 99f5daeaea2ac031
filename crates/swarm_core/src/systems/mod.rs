pub mod collision;
pub mod metrics_snapshot;
pub mod movement;
pub mod spatial_index;
pub mod steering;
pub mod stream_assignment;

//! Setup errors surfaced to the caller before a run starts.
//!
//! Per-frame numeric degeneracies (zero-length normalization, coincident
//! positions, empty aggregates) are resolved by guarded fallbacks in the
//! systems themselves and never reach this type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwarmError {
    /// A drone with this id is already registered in the world.
    #[error("drone id {0:?} already exists")]
    DuplicateDroneId(String),

    /// Configuration rejected by [`crate::config::FlockingConfig::validate`]
    /// or by the space-bounds constructor.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_the_offending_value() {
        let err = SwarmError::DuplicateDroneId("delivery_0".to_string());
        assert!(err.to_string().contains("delivery_0"));

        let err = SwarmError::InvalidConfiguration("max_speed must be positive".to_string());
        assert!(err.to_string().contains("max_speed"));
    }
}

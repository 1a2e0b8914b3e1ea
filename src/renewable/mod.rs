pub mod dispatch;
pub mod integration;
pub mod solar;
pub mod wind;

pub use dispatch::*;
pub use integration::*;
pub use solar::*;
pub use wind::*;

use thiserror::Error;

/// Errors from the generation forecasters and renewable analytics.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("source {id}: capacity must be positive (got {capacity_mw} MW)")]
    NonPositiveCapacity { id: i64, capacity_mw: f64 },

    #[error("source {id}: efficiency must be in (0, 100] (got {efficiency_percent}%)")]
    InvalidEfficiency { id: i64, efficiency_percent: f64 },

    #[error("no renewable sources supplied")]
    NoSources,

    #[error("total demand must be positive (got {0} MW)")]
    NonPositiveDemand(f64),
}

pub(crate) fn validate_source(
    source: &crate::domain::RenewableSource,
) -> Result<(), GenerationError> {
    if source.capacity_mw <= 0.0 {
        return Err(GenerationError::NonPositiveCapacity {
            id: source.id,
            capacity_mw: source.capacity_mw,
        });
    }
    if source.efficiency_percent <= 0.0 || source.efficiency_percent > 100.0 {
        return Err(GenerationError::InvalidEfficiency {
            id: source.id,
            efficiency_percent: source.efficiency_percent,
        });
    }
    Ok(())
}

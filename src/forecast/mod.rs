pub mod demand;
pub mod metrics;

pub use demand::*;
pub use metrics::*;

use thiserror::Error;

/// Errors from the demand forecasters.
#[derive(Debug, Clone, Error)]
pub enum ForecastError {
    #[error("historical demand series is empty")]
    EmptyHistory,

    #[error("last observed demand is negative: {0} MW")]
    NegativeDemand(f64),
}

pub mod patterns;
pub mod risk;
pub mod schedule;

pub use patterns::*;
pub use risk::*;
pub use schedule::*;

use thiserror::Error;

/// Errors from the maintenance analytics.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("equipment {id} ({name}): {reason}")]
    InvalidEquipment {
        id: i64,
        name: String,
        reason: String,
    },

    #[error("equipment fleet is empty")]
    EmptyFleet,
}

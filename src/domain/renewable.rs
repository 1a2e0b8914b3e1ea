use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Renewable technology of a generation source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    Solar,
    Wind,
    Hydro,
}

/// A renewable generation source attached to a grid node.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenewableSource {
    pub id: i64,
    pub node_id: i64,
    pub kind: SourceKind,
    /// Installed capacity in MW.
    #[validate(range(min = 0.0))]
    pub capacity_mw: f64,
    #[validate(range(min = 0.0))]
    pub current_generation_mw: f64,
    /// Conversion efficiency in percent (0, 100].
    #[validate(range(min = 0.0, max = 100.0))]
    pub efficiency_percent: f64,
}

/// Forecast generation for one source at one timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationForecastPoint {
    pub source_id: i64,
    pub timestamp: DateTime<Utc>,
    pub predicted_power_mw: f64,
    pub confidence_lower_mw: f64,
    pub confidence_upper_mw: f64,
    /// Human-readable weather summary for the dashboard.
    pub conditions: String,
}

/// Dispatch advisory for one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRecommendation {
    pub source_id: i64,
    pub recommended_output_mw: f64,
    /// Dispatch priority; higher means dispatch first.
    pub priority: f64,
    pub reason: String,
}

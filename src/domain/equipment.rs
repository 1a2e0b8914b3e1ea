use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Equipment classes tracked by the monitoring product.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentKind {
    Transformer,
    Breaker,
    Capacitor,
    Reactor,
    Other,
}

impl EquipmentKind {
    /// Base maintenance cost in USD, before risk scaling.
    pub fn base_maintenance_cost_usd(self) -> f64 {
        match self {
            EquipmentKind::Transformer => 50_000.0,
            EquipmentKind::Breaker => 15_000.0,
            EquipmentKind::Capacitor => 8_000.0,
            EquipmentKind::Reactor => 12_000.0,
            EquipmentKind::Other => 5_000.0,
        }
    }

    /// Base outage duration in hours, before risk scaling.
    pub fn base_downtime_hours(self) -> f64 {
        match self {
            EquipmentKind::Transformer => 48.0,
            EquipmentKind::Breaker => 12.0,
            EquipmentKind::Capacitor => 8.0,
            EquipmentKind::Reactor => 16.0,
            EquipmentKind::Other => 6.0,
        }
    }
}

/// Discrete risk tier derived from a continuous failure probability.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Tier boundaries are inclusive at the lower edge: 80.0 is critical,
    /// 79.999 is high.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 80.0 {
            RiskLevel::Critical
        } else if probability >= 60.0 {
            RiskLevel::High
        } else if probability >= 40.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn cost_multiplier(self) -> f64 {
        match self {
            RiskLevel::Low => 0.5,
            RiskLevel::Medium => 1.0,
            RiskLevel::High => 1.5,
            RiskLevel::Critical => 2.5,
        }
    }

    pub fn downtime_multiplier(self) -> f64 {
        match self {
            RiskLevel::Low => 0.5,
            RiskLevel::Medium => 1.0,
            RiskLevel::High => 1.5,
            RiskLevel::Critical => 2.0,
        }
    }
}

/// Condition snapshot of one piece of grid equipment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EquipmentSnapshot {
    pub id: i64,
    pub name: String,
    pub kind: EquipmentKind,
    #[validate(range(min = 0.0))]
    pub age_years: f64,
    pub last_maintenance: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub operating_hours: f64,
    #[validate(range(min = 0.0))]
    pub average_load_mw: f64,
    #[validate(range(min = 0.0))]
    pub max_load_mw: f64,
    pub temperature_c: f64,
    #[validate(range(min = 0.0))]
    pub vibration_mm_s: f64,
    /// Number of recorded failures over the equipment's life.
    pub failure_history: u32,
}

/// Risk assessment for one piece of equipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenancePrediction {
    pub equipment_id: i64,
    pub equipment_name: String,
    /// Failure probability in percent, clamped to [0, 100].
    pub failure_probability: f64,
    pub risk: RiskLevel,
    pub recommended_action: String,
    pub estimated_days_to_failure: f64,
    /// Scheduling priority in [1, 10].
    pub priority: u8,
    pub estimated_cost_usd: f64,
    pub estimated_downtime_hours: f64,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Operating snapshot of a grid node (substation, generator or load bus).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GridNodeSnapshot {
    pub id: i64,
    pub name: String,
    /// Measured bus voltage in kV.
    #[validate(range(min = 0.0))]
    pub voltage_kv: f64,
    #[validate(range(min = 0.0))]
    pub capacity_mw: f64,
    #[validate(range(min = 0.0))]
    pub current_load_mw: f64,
}

impl GridNodeSnapshot {
    /// Load factor, or `None` when the node has no rated capacity.
    pub fn utilization(&self) -> Option<f64> {
        (self.capacity_mw > 0.0).then(|| self.current_load_mw / self.capacity_mw)
    }

    /// Renewable plants are tagged by name in the source inventory.
    pub fn is_renewable(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("solar") || name.contains("wind")
    }
}

/// Operating snapshot of a transmission line between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TransmissionLineSnapshot {
    pub id: i64,
    pub from_node: i64,
    pub to_node: i64,
    #[validate(range(min = 0.0))]
    pub capacity_mw: f64,
    #[validate(range(min = 0.0))]
    pub current_flow_mw: f64,
    #[validate(range(min = 0.0))]
    pub resistance_ohm: f64,
}

impl TransmissionLineSnapshot {
    pub fn utilization(&self) -> Option<f64> {
        (self.capacity_mw > 0.0).then(|| self.current_flow_mw / self.capacity_mw)
    }

    /// I^2*R loss in the heuristic units the rule thresholds use.
    pub fn loss_heuristic(&self) -> f64 {
        self.current_flow_mw.powi(2) * self.resistance_ohm
    }
}

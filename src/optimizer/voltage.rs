//! Voltage-control advisory.
//!
//! Flags nodes whose measured voltage drifts outside the tolerance band
//! around nominal and says which way to steer it.

use std::time::Instant;
use tracing::info;

use super::{OptimizationOutcome, Priority, Recommendation, RecommendationKind};
use crate::config::OptimizerConfig;
use crate::domain::GridNodeSnapshot;

const SAVINGS_PER_MW_USD: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct VoltageAdvisor {
    pub nominal_kv: f64,
    /// Allowed relative deviation before a recommendation fires.
    pub tolerance: f64,
    /// Relative deviation that escalates the recommendation to high priority.
    pub severe_deviation: f64,
}

impl Default for VoltageAdvisor {
    fn default() -> Self {
        Self {
            nominal_kv: 220.0,
            tolerance: 0.05,
            severe_deviation: 0.10,
        }
    }
}

impl VoltageAdvisor {
    pub fn from_config(cfg: &OptimizerConfig) -> Self {
        Self {
            nominal_kv: cfg.nominal_voltage_kv,
            tolerance: cfg.voltage_tolerance,
            ..Self::default()
        }
    }

    pub fn evaluate(&self, nodes: &[GridNodeSnapshot]) -> OptimizationOutcome {
        let started = Instant::now();
        let mut recommendations = Vec::new();

        for node in nodes {
            let deviation = (node.voltage_kv - self.nominal_kv).abs() / self.nominal_kv;
            if deviation <= self.tolerance {
                continue;
            }
            let direction = if node.voltage_kv > self.nominal_kv {
                "lower"
            } else {
                "raise"
            };
            recommendations.push(Recommendation {
                kind: RecommendationKind::AdjustVoltage,
                description: format!(
                    "Node {}: voltage {:.1} kV outside the {:.0}% band; {} voltage",
                    node.name,
                    node.voltage_kv,
                    self.tolerance * 100.0,
                    direction
                ),
                affected_entities: vec![node.id],
                priority: if deviation > self.severe_deviation {
                    Priority::High
                } else {
                    Priority::Medium
                },
                estimated_impact_mw: deviation * 100.0,
            });
        }

        let objective_value = recommendations.len() as f64 * 10.0;
        info!(
            flagged = recommendations.len(),
            nodes = nodes.len(),
            "voltage review complete"
        );
        OptimizationOutcome::assemble(
            objective_value,
            recommendations,
            SAVINGS_PER_MW_USD,
            started,
        )
    }
}

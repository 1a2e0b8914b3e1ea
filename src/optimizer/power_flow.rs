//! Power-flow advisory rules.
//!
//! Four independent threshold checks over node/line snapshots. The overload
//! check always runs; the others are gated by the caller's objective flags.

use std::time::Instant;
use tracing::{debug, info};

use super::{OptimizationObjectives, OptimizationOutcome, Priority, Recommendation, RecommendationKind};
use crate::config::OptimizerConfig;
use crate::domain::{GridNodeSnapshot, TransmissionLineSnapshot};

/// Dollar value attributed to each estimated MW of improvement.
const SAVINGS_PER_MW_USD: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct PowerFlowAdvisor {
    /// Line utilization above which redistribution fires.
    pub overload_threshold: f64,
    /// Load-factor standard deviation that counts as imbalance.
    pub imbalance_threshold: f64,
    /// Per-line I^2*R heuristic loss above which voltage adjustment fires.
    pub line_loss_threshold: f64,
    /// Renewable nodes below this utilization get a dispatch-increase nudge.
    pub renewable_floor: f64,
    /// Node load factor that counts as overloaded in the balance check.
    pub node_hot_threshold: f64,
    /// Node load factor that counts as underused in the balance check.
    pub node_cold_threshold: f64,
}

impl Default for PowerFlowAdvisor {
    fn default() -> Self {
        Self {
            overload_threshold: 0.9,
            imbalance_threshold: 0.2,
            line_loss_threshold: 10.0,
            renewable_floor: 0.7,
            node_hot_threshold: 0.85,
            node_cold_threshold: 0.5,
        }
    }
}

impl PowerFlowAdvisor {
    pub fn from_config(cfg: &OptimizerConfig) -> Self {
        Self {
            overload_threshold: cfg.overload_threshold,
            imbalance_threshold: cfg.imbalance_threshold,
            line_loss_threshold: cfg.line_loss_threshold,
            renewable_floor: cfg.renewable_floor,
            ..Self::default()
        }
    }

    /// Evaluate all applicable rules. Empty snapshots are a no-op.
    pub fn evaluate(
        &self,
        nodes: &[GridNodeSnapshot],
        lines: &[TransmissionLineSnapshot],
        objectives: &OptimizationObjectives,
    ) -> OptimizationOutcome {
        let started = Instant::now();
        let mut recommendations = Vec::new();

        // Overloaded lines endanger the grid no matter what the caller asked
        // to optimize for, so this check is unconditional.
        recommendations.extend(self.check_overloads(lines));

        if objectives.balance_load {
            recommendations.extend(self.check_imbalance(nodes));
        }
        if objectives.minimize_losses {
            recommendations.extend(self.check_line_losses(lines));
        }
        if objectives.maximize_renewables {
            recommendations.extend(self.check_renewable_headroom(nodes));
        }

        let objective_value = self.objective_value(nodes, lines, objectives);
        info!(
            recommendations = recommendations.len(),
            objective_value, "power flow evaluation complete"
        );
        OptimizationOutcome::assemble(
            objective_value,
            recommendations,
            SAVINGS_PER_MW_USD,
            started,
        )
    }

    fn check_overloads(&self, lines: &[TransmissionLineSnapshot]) -> Vec<Recommendation> {
        lines
            .iter()
            .filter(|line| {
                line.utilization()
                    .is_some_and(|u| u > self.overload_threshold)
            })
            .map(|line| {
                let utilization = line.utilization().unwrap_or_default();
                debug!(line = line.id, utilization, "overloaded line");
                Recommendation {
                    kind: RecommendationKind::RedistributeLoad,
                    description: format!(
                        "Line {} loaded at {:.0}%; redistribute flow",
                        line.id,
                        utilization * 100.0
                    ),
                    affected_entities: vec![line.id],
                    priority: Priority::High,
                    estimated_impact_mw: (line.current_flow_mw
                        - line.capacity_mw * 0.8)
                        * 0.05,
                }
            })
            .collect()
    }

    fn check_imbalance(&self, nodes: &[GridNodeSnapshot]) -> Vec<Recommendation> {
        let imbalance = load_imbalance(nodes);
        if imbalance <= self.imbalance_threshold {
            return Vec::new();
        }

        let hot: Vec<i64> = nodes
            .iter()
            .filter(|n| n.utilization().is_some_and(|u| u > self.node_hot_threshold))
            .map(|n| n.id)
            .collect();
        let cold: Vec<i64> = nodes
            .iter()
            .filter(|n| n.utilization().is_some_and(|u| u < self.node_cold_threshold))
            .map(|n| n.id)
            .collect();
        if hot.is_empty() || cold.is_empty() {
            return Vec::new();
        }

        vec![Recommendation {
            kind: RecommendationKind::RedistributeLoad,
            description: format!(
                "Load imbalance detected ({:.0}%); redistribute between nodes",
                imbalance * 100.0
            ),
            affected_entities: hot.into_iter().chain(cold).collect(),
            priority: Priority::Medium,
            estimated_impact_mw: imbalance * 100.0,
        }]
    }

    fn check_line_losses(&self, lines: &[TransmissionLineSnapshot]) -> Vec<Recommendation> {
        lines
            .iter()
            .filter(|line| line.loss_heuristic() > self.line_loss_threshold)
            .map(|line| Recommendation {
                kind: RecommendationKind::AdjustVoltage,
                description: format!(
                    "Line {} has elevated resistive losses; raise voltage to cut current",
                    line.id
                ),
                affected_entities: vec![line.from_node, line.to_node],
                priority: Priority::Medium,
                estimated_impact_mw: line.loss_heuristic() * 0.3,
            })
            .collect()
    }

    fn check_renewable_headroom(&self, nodes: &[GridNodeSnapshot]) -> Vec<Recommendation> {
        nodes
            .iter()
            .filter(|n| n.is_renewable())
            .filter(|n| n.utilization().is_some_and(|u| u < self.renewable_floor))
            .map(|node| {
                let utilization = node.utilization().unwrap_or_default();
                Recommendation {
                    kind: RecommendationKind::IncreaseRenewable,
                    description: format!(
                        "Renewable node {} running at {:.0}%; increase dispatch",
                        node.name,
                        utilization * 100.0
                    ),
                    affected_entities: vec![node.id],
                    priority: Priority::High,
                    estimated_impact_mw: (node.capacity_mw - node.current_load_mw) * 0.8,
                }
            })
            .collect()
    }

    fn objective_value(
        &self,
        nodes: &[GridNodeSnapshot],
        lines: &[TransmissionLineSnapshot],
        objectives: &OptimizationObjectives,
    ) -> f64 {
        let mut value = 0.0;
        if objectives.minimize_losses {
            value += transmission_losses_mw(lines) * 100.0;
        }
        if objectives.balance_load {
            value += load_imbalance(nodes) * 1000.0;
        }
        if objectives.maximize_renewables {
            // Negative term: higher renewable utilization is better.
            value -= renewable_utilization(nodes) * 500.0;
        }
        value
    }
}

/// Standard deviation of node load factors.
pub fn load_imbalance(nodes: &[GridNodeSnapshot]) -> f64 {
    let factors: Vec<f64> = nodes.iter().filter_map(|n| n.utilization()).collect();
    if factors.is_empty() {
        return 0.0;
    }
    let mean = factors.iter().sum::<f64>() / factors.len() as f64;
    let variance =
        factors.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / factors.len() as f64;
    variance.sqrt()
}

/// Total I^2*R losses across lines, in MW.
pub fn transmission_losses_mw(lines: &[TransmissionLineSnapshot]) -> f64 {
    lines.iter().map(|l| l.loss_heuristic() / 1000.0).sum()
}

/// Mean load factor over renewable-tagged nodes; 0 when there are none.
pub fn renewable_utilization(nodes: &[GridNodeSnapshot]) -> f64 {
    let factors: Vec<f64> = nodes
        .iter()
        .filter(|n| n.is_renewable())
        .filter_map(|n| n.utilization())
        .collect();
    if factors.is_empty() {
        return 0.0;
    }
    factors.iter().sum::<f64>() / factors.len() as f64
}

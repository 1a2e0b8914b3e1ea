use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which rule families the power-flow advisor evaluates.
///
/// `minimize_costs` is accepted but no current rule consumes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptimizationObjectives {
    pub minimize_losses: bool,
    pub minimize_costs: bool,
    pub maximize_renewables: bool,
    pub balance_load: bool,
}

impl Default for OptimizationObjectives {
    fn default() -> Self {
        Self {
            minimize_losses: true,
            minimize_costs: true,
            maximize_renewables: true,
            balance_load: true,
        }
    }
}

/// Recommendation urgency; orders high > medium > low.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecommendationKind {
    SwitchLine,
    AdjustVoltage,
    RedistributeLoad,
    IncreaseRenewable,
}

/// One advisory emitted by a rule check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub description: String,
    /// Node and/or line ids the action touches.
    pub affected_entities: Vec<i64>,
    pub priority: Priority,
    /// Rough MW benefit the rule attributes to the action.
    pub estimated_impact_mw: f64,
}

/// Result of one advisor run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// Ad-hoc weighted sum of the evaluated rule terms; comparable only
    /// between runs of the same advisor.
    pub objective_value: f64,
    /// Sorted high > medium > low.
    pub recommendations: Vec<Recommendation>,
    pub estimated_savings_usd: f64,
    pub execution_time_ms: u64,
}

impl OptimizationOutcome {
    pub(crate) fn assemble(
        objective_value: f64,
        mut recommendations: Vec<Recommendation>,
        savings_per_impact_usd: f64,
        started: std::time::Instant,
    ) -> Self {
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        let estimated_savings_usd = recommendations
            .iter()
            .map(|r| r.estimated_impact_mw)
            .sum::<f64>()
            * savings_per_impact_usd;
        Self {
            objective_value,
            recommendations,
            estimated_savings_usd,
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priorities_order_correctly() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn kinds_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&RecommendationKind::RedistributeLoad).unwrap(),
            "\"redistribute_load\""
        );
        assert_eq!(RecommendationKind::SwitchLine.to_string(), "switch_line");
    }

    #[test]
    fn assemble_sorts_and_prices_recommendations() {
        let rec = |priority, impact| Recommendation {
            kind: RecommendationKind::AdjustVoltage,
            description: String::new(),
            affected_entities: vec![],
            priority,
            estimated_impact_mw: impact,
        };
        let outcome = OptimizationOutcome::assemble(
            0.0,
            vec![rec(Priority::Low, 1.0), rec(Priority::High, 2.0)],
            50.0,
            std::time::Instant::now(),
        );
        assert_eq!(outcome.recommendations[0].priority, Priority::High);
        assert_eq!(outcome.estimated_savings_usd, 150.0);
    }
}

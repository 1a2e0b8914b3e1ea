//! Renewable integration analysis.
//!
//! Summarizes how much of demand renewables cover and how exposed the mix is
//! to variable (solar/wind) output, plus a coarse 0-100 integration score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GenerationError;
use crate::domain::{RenewableSource, SourceKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationReport {
    /// Share of total demand covered by renewable generation, percent.
    pub renewable_penetration_percent: f64,
    /// Share of renewable capacity that is variable (solar + wind), percent.
    pub variability_index: f64,
    /// Coarse 0-100 score: penetration helps, variability hurts,
    /// dispatchable hydro helps.
    pub integration_score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrationAnalyzer;

impl IntegrationAnalyzer {
    pub fn analyze(
        &self,
        sources: &[RenewableSource],
        total_demand_mw: f64,
    ) -> Result<IntegrationReport, GenerationError> {
        if sources.is_empty() {
            return Err(GenerationError::NoSources);
        }
        if total_demand_mw <= 0.0 {
            return Err(GenerationError::NonPositiveDemand(total_demand_mw));
        }

        let capacity_of = |kind: SourceKind| {
            sources
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| s.capacity_mw)
                .sum::<f64>()
        };

        let total_capacity: f64 = sources.iter().map(|s| s.capacity_mw).sum();
        let total_generation: f64 = sources.iter().map(|s| s.current_generation_mw).sum();
        let hydro_capacity = capacity_of(SourceKind::Hydro);
        let variable_capacity = capacity_of(SourceKind::Solar) + capacity_of(SourceKind::Wind);

        let renewable_penetration_percent = total_generation / total_demand_mw * 100.0;
        let variability_index = if total_capacity > 0.0 {
            variable_capacity / total_capacity * 100.0
        } else {
            0.0
        };
        let hydro_share = if total_capacity > 0.0 {
            hydro_capacity / total_capacity
        } else {
            0.0
        };

        let integration_score = 50.0
            + (renewable_penetration_percent / 2.0).min(30.0)
            - (variability_index / 5.0).min(20.0)
            + (hydro_share * 100.0 / 5.0).min(20.0);

        let mut recommendations = Vec::new();
        if renewable_penetration_percent < 20.0 {
            recommendations
                .push("Expand renewable capacity to improve sustainability".to_string());
        }
        if variability_index > 70.0 {
            recommendations.push(
                "High variability in the mix; consider energy storage systems".to_string(),
            );
        }
        if hydro_share < 0.2 {
            recommendations.push(
                "Add dispatchable renewables (hydro) to improve stability".to_string(),
            );
        }
        if renewable_penetration_percent > 50.0 && variability_index > 60.0 {
            recommendations.push(
                "Deploy advanced forecasting and control to manage variability".to_string(),
            );
        }

        debug!(
            penetration = renewable_penetration_percent,
            variability = variability_index,
            score = integration_score,
            "integration analysis"
        );
        Ok(IntegrationReport {
            renewable_penetration_percent,
            variability_index,
            integration_score,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(kind: SourceKind, capacity: f64, generation: f64) -> RenewableSource {
        RenewableSource {
            id: 1,
            node_id: 1,
            kind,
            capacity_mw: capacity,
            current_generation_mw: generation,
            efficiency_percent: 90.0,
        }
    }

    #[test]
    fn hydro_heavy_mix_scores_higher_than_variable_mix() {
        let analyzer = IntegrationAnalyzer;
        let hydro = analyzer
            .analyze(&[source(SourceKind::Hydro, 1000.0, 600.0)], 2000.0)
            .unwrap();
        let variable = analyzer
            .analyze(
                &[
                    source(SourceKind::Solar, 500.0, 300.0),
                    source(SourceKind::Wind, 500.0, 300.0),
                ],
                2000.0,
            )
            .unwrap();
        assert!(hydro.integration_score > variable.integration_score);
        assert_eq!(hydro.variability_index, 0.0);
        assert_eq!(variable.variability_index, 100.0);
    }

    #[test]
    fn low_penetration_triggers_expansion_advice() {
        let analyzer = IntegrationAnalyzer;
        let report = analyzer
            .analyze(&[source(SourceKind::Hydro, 100.0, 50.0)], 10_000.0)
            .unwrap();
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Expand renewable capacity")));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let analyzer = IntegrationAnalyzer;
        assert!(matches!(
            analyzer.analyze(&[], 1000.0),
            Err(GenerationError::NoSources)
        ));
        assert!(matches!(
            analyzer.analyze(&[source(SourceKind::Hydro, 1.0, 1.0)], 0.0),
            Err(GenerationError::NonPositiveDemand(_))
        ));
    }
}

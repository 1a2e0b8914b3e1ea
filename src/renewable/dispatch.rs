//! Renewable dispatch planning.
//!
//! Ranks sources by how much dependable energy their forecast promises
//! (capacity factor discounted by variability) and recommends an output level
//! per source, then rescales the whole plan if it badly over- or under-shoots
//! the demand target.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use tracing::{debug, info};

use super::GenerationError;
use crate::domain::{DispatchRecommendation, GenerationForecastPoint, RenewableSource};

#[derive(Debug, Clone)]
pub struct DispatchPlanner {
    /// Capacity factor above which a source runs near nameplate.
    pub high_cf: f64,
    /// Capacity factor above which the forecast is trusted as-is.
    pub mid_cf: f64,
    /// Capacity factor below which the source is parked.
    pub low_cf: f64,
    /// Overshoot ratio that triggers scaling the plan back.
    pub surplus_ratio: f64,
    /// Undershoot ratio that triggers maximizing every source.
    pub deficit_ratio: f64,
}

impl Default for DispatchPlanner {
    fn default() -> Self {
        Self {
            high_cf: 0.8,
            mid_cf: 0.5,
            low_cf: 0.2,
            surplus_ratio: 1.2,
            deficit_ratio: 0.5,
        }
    }
}

impl DispatchPlanner {
    /// Build per-source dispatch recommendations against a demand target.
    ///
    /// Sources without any forecast points are skipped; an empty source list
    /// yields an empty plan.
    pub fn plan(
        &self,
        sources: &[RenewableSource],
        predictions: &[GenerationForecastPoint],
        target_demand_mw: f64,
    ) -> Result<Vec<DispatchRecommendation>, GenerationError> {
        if target_demand_mw <= 0.0 {
            return Err(GenerationError::NonPositiveDemand(target_demand_mw));
        }

        let by_source = predictions
            .iter()
            .map(|p| (p.source_id, p))
            .into_group_map();

        let mut recommendations = Vec::new();
        for source in sources {
            let Some(points) = by_source.get(&source.id) else {
                debug!(source_id = source.id, "no forecast points, skipping");
                continue;
            };
            if source.capacity_mw <= 0.0 {
                continue;
            }

            let mean = points.iter().map(|p| p.predicted_power_mw).sum::<f64>()
                / points.len() as f64;
            let capacity_factor = mean / source.capacity_mw;

            let variance = points
                .iter()
                .map(|p| (p.predicted_power_mw - mean).powi(2))
                .sum::<f64>()
                / points.len() as f64;
            let variability = if mean > 0.0 {
                variance.sqrt() / mean
            } else {
                0.0
            };

            let priority = capacity_factor * (1.0 - variability.min(0.5)) * 10.0;

            let (recommended_output_mw, reason) = if capacity_factor > self.high_cf {
                (
                    source.capacity_mw * 0.9,
                    "high resource availability, maximize generation",
                )
            } else if capacity_factor > self.mid_cf {
                (mean, "favourable conditions, hold predicted output")
            } else if capacity_factor > self.low_cf {
                (mean * 0.8, "variable conditions, operate with safety margin")
            } else {
                (0.0, "unfavourable conditions, consider disconnecting")
            };

            recommendations.push(DispatchRecommendation {
                source_id: source.id,
                recommended_output_mw,
                priority,
                reason: reason.to_string(),
            });
        }

        recommendations.sort_by_key(|r| Reverse(OrderedFloat(r.priority)));
        self.fit_to_target(sources, &mut recommendations, target_demand_mw);

        info!(
            sources = sources.len(),
            planned = recommendations.len(),
            target_demand_mw,
            "dispatch plan built"
        );
        Ok(recommendations)
    }

    /// Rescale the plan when total output strays too far from the target.
    fn fit_to_target(
        &self,
        sources: &[RenewableSource],
        recommendations: &mut [DispatchRecommendation],
        target_demand_mw: f64,
    ) {
        let total: f64 = recommendations
            .iter()
            .map(|r| r.recommended_output_mw)
            .sum();

        if total > target_demand_mw * self.surplus_ratio {
            let scale = target_demand_mw * 1.1 / total;
            for rec in recommendations.iter_mut() {
                rec.recommended_output_mw *= scale;
                rec.reason.push_str(" (scaled back, generation surplus)");
            }
        } else if total < target_demand_mw * self.deficit_ratio {
            for rec in recommendations.iter_mut() {
                if let Some(source) = sources.iter().find(|s| s.id == rec.source_id) {
                    rec.recommended_output_mw = source.capacity_mw * 0.95;
                    rec.reason.push_str(" (maximized to cover deficit)");
                }
            }
        }
    }
}

//! Greedy maintenance planning.
//!
//! Places medium-or-higher-risk work onto a calendar while respecting a
//! daily-downtime cap and a total budget. Highest priority claims resources
//! first; days roll over when the downtime cap fills up.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::info;

use crate::domain::{MaintenancePrediction, RiskLevel};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaintenanceKind {
    Preventive,
    Predictive,
}

/// One planned maintenance slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMaintenance {
    pub equipment_id: i64,
    pub scheduled_for: DateTime<Utc>,
    pub kind: MaintenanceKind,
    pub estimated_duration_hours: f64,
    pub estimated_cost_usd: f64,
}

/// Resource limits the planner works within.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConstraints {
    pub max_daily_downtime_hours: f64,
    pub available_budget_usd: f64,
    /// Crew availability; informational in the current planner.
    pub maintenance_teams: u32,
}

impl Default for ScheduleConstraints {
    fn default() -> Self {
        Self {
            max_daily_downtime_hours: 24.0,
            available_budget_usd: 500_000.0,
            maintenance_teams: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenancePlanner;

impl MaintenancePlanner {
    /// Build a date-ordered plan from risk predictions.
    ///
    /// Low-risk equipment is skipped; work that would break the budget is
    /// dropped; the rest lands on the earliest day with downtime headroom,
    /// shifted by how urgent the risk tier says the work is.
    pub fn plan(
        &self,
        predictions: &[MaintenancePrediction],
        constraints: &ScheduleConstraints,
        start: DateTime<Utc>,
    ) -> Vec<ScheduledMaintenance> {
        let mut by_priority: Vec<&MaintenancePrediction> = predictions.iter().collect();
        by_priority.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut schedule = Vec::new();
        let mut current_day = start;
        let mut daily_downtime = 0.0;
        let mut total_cost = 0.0;

        for prediction in by_priority {
            if prediction.risk == RiskLevel::Low {
                continue;
            }
            if total_cost + prediction.estimated_cost_usd > constraints.available_budget_usd {
                continue;
            }

            if daily_downtime + prediction.estimated_downtime_hours
                > constraints.max_daily_downtime_hours
            {
                current_day += Duration::days(1);
                daily_downtime = 0.0;
            }

            let urgency_days = match prediction.risk {
                RiskLevel::Critical => 1.0,
                RiskLevel::High => (prediction.estimated_days_to_failure / 2.0).min(7.0),
                _ => (prediction.estimated_days_to_failure / 2.0).min(30.0),
            };

            schedule.push(ScheduledMaintenance {
                equipment_id: prediction.equipment_id,
                scheduled_for: current_day + Duration::days(urgency_days as i64),
                kind: match prediction.risk {
                    RiskLevel::Critical | RiskLevel::High => MaintenanceKind::Predictive,
                    _ => MaintenanceKind::Preventive,
                },
                estimated_duration_hours: prediction.estimated_downtime_hours,
                estimated_cost_usd: prediction.estimated_cost_usd,
            });

            daily_downtime += prediction.estimated_downtime_hours;
            total_cost += prediction.estimated_cost_usd;
        }

        schedule.sort_by_key(|s| s.scheduled_for);
        info!(
            planned = schedule.len(),
            total_cost_usd = total_cost,
            "maintenance plan built"
        );
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(
        id: i64,
        risk: RiskLevel,
        priority: u8,
        cost: f64,
        downtime: f64,
    ) -> MaintenancePrediction {
        MaintenancePrediction {
            equipment_id: id,
            equipment_name: format!("EQ-{id}"),
            failure_probability: 50.0,
            risk,
            recommended_action: String::new(),
            estimated_days_to_failure: 40.0,
            priority,
            estimated_cost_usd: cost,
            estimated_downtime_hours: downtime,
        }
    }

    #[test]
    fn low_risk_is_skipped() {
        let planner = MaintenancePlanner;
        let plan = planner.plan(
            &[prediction(1, RiskLevel::Low, 2, 1_000.0, 4.0)],
            &ScheduleConstraints::default(),
            Utc::now(),
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn budget_cap_drops_expensive_work() {
        let planner = MaintenancePlanner;
        let constraints = ScheduleConstraints {
            available_budget_usd: 60_000.0,
            ..Default::default()
        };
        let plan = planner.plan(
            &[
                prediction(1, RiskLevel::Critical, 10, 50_000.0, 8.0),
                prediction(2, RiskLevel::High, 8, 50_000.0, 8.0),
                prediction(3, RiskLevel::Medium, 5, 9_000.0, 4.0),
            ],
            &constraints,
            Utc::now(),
        );
        // The critical job eats most of the budget; only the cheap medium fits.
        let ids: Vec<i64> = plan.iter().map(|s| s.equipment_id).collect();
        assert!(ids.contains(&1));
        assert!(!ids.contains(&2));
        assert!(ids.contains(&3));
    }

    #[test]
    fn daily_downtime_rolls_over() {
        let planner = MaintenancePlanner;
        let constraints = ScheduleConstraints {
            max_daily_downtime_hours: 10.0,
            ..Default::default()
        };
        let start = Utc::now();
        let plan = planner.plan(
            &[
                prediction(1, RiskLevel::Critical, 10, 1_000.0, 8.0),
                prediction(2, RiskLevel::Critical, 9, 1_000.0, 8.0),
            ],
            &constraints,
            start,
        );
        assert_eq!(plan.len(), 2);
        // Second job cannot fit the same day, so the slots differ by a day.
        let days: Vec<i64> = plan
            .iter()
            .map(|s| (s.scheduled_for - start).num_days())
            .collect();
        assert_ne!(days[0], days[1]);
    }

    #[test]
    fn plan_is_date_ordered_and_kinds_follow_risk() {
        let planner = MaintenancePlanner;
        let plan = planner.plan(
            &[
                prediction(1, RiskLevel::Medium, 4, 1_000.0, 2.0),
                prediction(2, RiskLevel::Critical, 10, 1_000.0, 2.0),
                prediction(3, RiskLevel::High, 7, 1_000.0, 2.0),
            ],
            &ScheduleConstraints::default(),
            Utc::now(),
        );
        assert!(plan.windows(2).all(|w| w[0].scheduled_for <= w[1].scheduled_for));
        for slot in &plan {
            match slot.equipment_id {
                1 => assert_eq!(slot.kind, MaintenanceKind::Preventive),
                _ => assert_eq!(slot.kind, MaintenanceKind::Predictive),
            }
        }
    }
}

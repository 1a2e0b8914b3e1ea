//! Fleet-level failure pattern analysis.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::MaintenanceError;
use crate::domain::{EquipmentKind, EquipmentSnapshot};

/// Ten years, the assumed horizon for a fleet with no recorded failures.
const NO_FAILURE_HORIZON_DAYS: f64 = 3650.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailurePatternReport {
    /// Up to three kinds with the highest mean failure count.
    pub common_failure_kinds: Vec<EquipmentKind>,
    /// Fleet-average days between failures, derived from age and counts.
    pub average_time_to_failure_days: f64,
    /// Mean base maintenance cost per kind present in the fleet.
    pub average_cost_by_kind: Vec<(EquipmentKind, f64)>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailurePatternAnalyzer;

impl FailurePatternAnalyzer {
    pub fn analyze(
        &self,
        fleet: &[EquipmentSnapshot],
    ) -> Result<FailurePatternReport, MaintenanceError> {
        if fleet.is_empty() {
            return Err(MaintenanceError::EmptyFleet);
        }

        let by_kind = fleet.iter().map(|eq| (eq.kind, eq)).into_group_map();

        let mean_failures = |group: &[&EquipmentSnapshot]| {
            group.iter().map(|eq| f64::from(eq.failure_history)).sum::<f64>()
                / group.len() as f64
        };

        let common_failure_kinds = by_kind
            .iter()
            .sorted_by(|a, b| mean_failures(b.1).total_cmp(&mean_failures(a.1)))
            .take(3)
            .map(|(kind, _)| *kind)
            .collect();

        let avg_age = fleet.iter().map(|eq| eq.age_years).sum::<f64>() / fleet.len() as f64;
        let avg_failures =
            fleet.iter().map(|eq| f64::from(eq.failure_history)).sum::<f64>()
                / fleet.len() as f64;
        let average_time_to_failure_days = if avg_failures > 0.0 {
            avg_age * 365.0 / avg_failures
        } else {
            NO_FAILURE_HORIZON_DAYS
        };

        let average_cost_by_kind = by_kind
            .keys()
            .sorted()
            .map(|kind| (*kind, kind.base_maintenance_cost_usd()))
            .collect();

        Ok(FailurePatternReport {
            common_failure_kinds,
            average_time_to_failure_days,
            average_cost_by_kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn unit(kind: EquipmentKind, age_years: f64, failures: u32) -> EquipmentSnapshot {
        EquipmentSnapshot {
            id: 0,
            name: "unit".into(),
            kind,
            age_years,
            last_maintenance: Utc::now(),
            operating_hours: 1000.0,
            average_load_mw: 10.0,
            max_load_mw: 20.0,
            temperature_c: 40.0,
            vibration_mm_s: 1.0,
            failure_history: failures,
        }
    }

    #[test]
    fn empty_fleet_is_an_error() {
        assert!(matches!(
            FailurePatternAnalyzer.analyze(&[]),
            Err(MaintenanceError::EmptyFleet)
        ));
    }

    #[test]
    fn worst_kind_ranks_first() {
        let fleet = vec![
            unit(EquipmentKind::Transformer, 20.0, 6),
            unit(EquipmentKind::Breaker, 10.0, 1),
            unit(EquipmentKind::Capacitor, 5.0, 0),
        ];
        let report = FailurePatternAnalyzer.analyze(&fleet).unwrap();
        assert_eq!(report.common_failure_kinds[0], EquipmentKind::Transformer);
        assert_eq!(report.common_failure_kinds.len(), 3);
    }

    #[test]
    fn failure_free_fleet_gets_long_horizon() {
        let fleet = vec![unit(EquipmentKind::Other, 3.0, 0)];
        let report = FailurePatternAnalyzer.analyze(&fleet).unwrap();
        assert_eq!(report.average_time_to_failure_days, NO_FAILURE_HORIZON_DAYS);
    }

    #[test]
    fn average_ttf_uses_age_and_counts() {
        // Mean age 10 years, mean 2 failures: 10*365/2.
        let fleet = vec![
            unit(EquipmentKind::Breaker, 8.0, 1),
            unit(EquipmentKind::Breaker, 12.0, 3),
        ];
        let report = FailurePatternAnalyzer.analyze(&fleet).unwrap();
        assert!((report.average_time_to_failure_days - 1825.0).abs() < 1e-9);
    }
}

//! Equipment failure-risk scoring.
//!
//! A fixed-weight linear combination of condition features squashed through a
//! logistic curve. A small uniform jitter models scoring uncertainty; the RNG
//! is caller-supplied so a fixed seed reproduces the same scores.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info};
use validator::Validate;

use super::MaintenanceError;
use crate::config::MaintenanceConfig;
use crate::domain::{EquipmentKind, EquipmentSnapshot, MaintenancePrediction, RiskLevel};

/// Weights for the feature vector, in extraction order: age, days since
/// maintenance, annualized operating hours, load factor, normalized
/// temperature, normalized vibration, failure count, transformer flag,
/// breaker flag.
const FEATURE_WEIGHTS: [f64; 9] = [0.15, 0.20, 0.15, 0.20, 0.10, 0.10, 0.10, 0.05, 0.05];

const HOURS_PER_YEAR: f64 = 8760.0;
const BASE_DAYS_TO_FAILURE: f64 = 365.0;

#[derive(Debug, Clone)]
pub struct FailureRiskScorer {
    /// Half-width of the uniform jitter added to the probability, in percent.
    pub jitter_amplitude: f64,
    pub sigmoid_gain: f64,
    pub sigmoid_midpoint: f64,
}

impl Default for FailureRiskScorer {
    fn default() -> Self {
        Self {
            jitter_amplitude: 2.5,
            sigmoid_gain: 5.0,
            sigmoid_midpoint: 0.5,
        }
    }
}

impl FailureRiskScorer {
    pub fn from_config(cfg: &MaintenanceConfig) -> Self {
        Self {
            jitter_amplitude: cfg.jitter_amplitude,
            sigmoid_gain: cfg.sigmoid_gain,
            sigmoid_midpoint: cfg.sigmoid_midpoint,
        }
    }

    /// Score a single piece of equipment as of the given instant.
    pub fn score<R: Rng + ?Sized>(
        &self,
        equipment: &EquipmentSnapshot,
        as_of: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<MaintenancePrediction, MaintenanceError> {
        validate_equipment(equipment)?;

        let features = self.features(equipment, as_of);
        let probability = self.probability(&features, rng);
        let risk = RiskLevel::from_probability(probability);
        let days_to_failure = days_to_failure(probability, equipment.age_years);
        let priority = priority(probability, equipment);

        let prediction = MaintenancePrediction {
            equipment_id: equipment.id,
            equipment_name: equipment.name.clone(),
            failure_probability: probability,
            risk,
            recommended_action: recommended_action(risk, days_to_failure),
            estimated_days_to_failure: days_to_failure,
            priority,
            estimated_cost_usd: equipment.kind.base_maintenance_cost_usd()
                * risk.cost_multiplier(),
            estimated_downtime_hours: equipment.kind.base_downtime_hours()
                * risk.downtime_multiplier(),
        };

        debug!(
            equipment_id = equipment.id,
            probability,
            risk = %risk,
            "scored equipment"
        );
        Ok(prediction)
    }

    /// Score a whole fleet, highest scheduling priority first.
    ///
    /// An empty fleet is a no-op and yields an empty list.
    pub fn score_fleet<R: Rng + ?Sized>(
        &self,
        fleet: &[EquipmentSnapshot],
        as_of: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Vec<MaintenancePrediction>, MaintenanceError> {
        let mut predictions = fleet
            .iter()
            .map(|eq| self.score(eq, as_of, rng))
            .collect::<Result<Vec<_>, _>>()?;

        predictions.sort_by(|a, b| {
            b.priority.cmp(&a.priority).then(
                b.failure_probability
                    .total_cmp(&a.failure_probability),
            )
        });

        let critical = predictions
            .iter()
            .filter(|p| p.risk == RiskLevel::Critical)
            .count();
        info!(
            fleet = fleet.len(),
            critical, "fleet risk scoring complete"
        );
        Ok(predictions)
    }

    fn features(&self, eq: &EquipmentSnapshot, as_of: DateTime<Utc>) -> [f64; 9] {
        let days_since_maintenance = (as_of - eq.last_maintenance).num_days().max(0) as f64;
        [
            eq.age_years,
            days_since_maintenance,
            eq.operating_hours / HOURS_PER_YEAR,
            eq.average_load_mw / eq.max_load_mw,
            eq.temperature_c / 100.0,
            eq.vibration_mm_s / 10.0,
            f64::from(eq.failure_history),
            f64::from(u8::from(eq.kind == EquipmentKind::Transformer)),
            f64::from(u8::from(eq.kind == EquipmentKind::Breaker)),
        ]
    }

    fn probability<R: Rng + ?Sized>(&self, features: &[f64; 9], rng: &mut R) -> f64 {
        let score: f64 = features
            .iter()
            .zip(FEATURE_WEIGHTS)
            .map(|(f, w)| f * w)
            .sum();

        let squashed =
            100.0 / (1.0 + (-self.sigmoid_gain * (score - self.sigmoid_midpoint)).exp());
        let jitter = rng.gen_range(-self.jitter_amplitude..=self.jitter_amplitude);
        (squashed + jitter).clamp(0.0, 100.0)
    }
}

fn validate_equipment(eq: &EquipmentSnapshot) -> Result<(), MaintenanceError> {
    let invalid = |reason: String| MaintenanceError::InvalidEquipment {
        id: eq.id,
        name: eq.name.clone(),
        reason,
    };
    eq.validate().map_err(|e| invalid(e.to_string()))?;
    if eq.max_load_mw <= 0.0 {
        return Err(invalid(format!(
            "max load must be positive (got {} MW)",
            eq.max_load_mw
        )));
    }
    Ok(())
}

/// Exponential decay of a one-year horizon, shortened further for old
/// equipment. Never below one day.
fn days_to_failure(probability: f64, age_years: f64) -> f64 {
    let decayed = BASE_DAYS_TO_FAILURE * (-probability / 30.0).exp();
    let age_factor = (1.0 - age_years / 30.0).max(0.1);
    (decayed * age_factor).max(1.0)
}

/// Scheduling priority in [1, 10]: probability-driven, transformers weighted
/// up, repeat offenders weighted up.
fn priority(probability: f64, eq: &EquipmentSnapshot) -> u8 {
    let mut value = probability / 10.0;
    if eq.kind == EquipmentKind::Transformer {
        value *= 1.5;
    }
    value += f64::from(eq.failure_history) * 0.5;
    value.round().clamp(1.0, 10.0) as u8
}

fn recommended_action(risk: RiskLevel, days_to_failure: f64) -> String {
    match risk {
        RiskLevel::Critical => "Immediate emergency maintenance required".to_string(),
        RiskLevel::High => format!(
            "Schedule maintenance within {} days",
            days_to_failure.round() as i64
        ),
        RiskLevel::Medium => "Include in next preventive maintenance cycle".to_string(),
        RiskLevel::Low => "Monitor condition, maintenance not urgent".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn snapshot(kind: EquipmentKind, age_years: f64, failures: u32) -> EquipmentSnapshot {
        EquipmentSnapshot {
            id: 7,
            name: "TR-07 Chivor".into(),
            kind,
            age_years,
            last_maintenance: Utc::now() - Duration::days(90),
            operating_hours: 40_000.0,
            average_load_mw: 60.0,
            max_load_mw: 100.0,
            temperature_c: 65.0,
            vibration_mm_s: 4.0,
            failure_history: failures,
        }
    }

    #[rstest]
    #[case(80.0, RiskLevel::Critical)]
    #[case(79.999, RiskLevel::High)]
    #[case(60.0, RiskLevel::High)]
    #[case(59.999, RiskLevel::Medium)]
    #[case(40.0, RiskLevel::Medium)]
    #[case(39.999, RiskLevel::Low)]
    #[case(0.0, RiskLevel::Low)]
    #[case(100.0, RiskLevel::Critical)]
    fn tier_boundaries_are_exact(#[case] probability: f64, #[case] expected: RiskLevel) {
        assert_eq!(RiskLevel::from_probability(probability), expected);
    }

    #[test]
    fn same_seed_reproduces_scores() {
        let scorer = FailureRiskScorer::default();
        let eq = snapshot(EquipmentKind::Transformer, 15.0, 2);
        let as_of = Utc::now();

        let a = scorer
            .score(&eq, as_of, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = scorer
            .score(&eq, as_of, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a.failure_probability, b.failure_probability);
        assert_eq!(a.priority, b.priority);
    }

    #[test]
    fn transformer_outranks_identical_breaker() {
        let scorer = FailureRiskScorer {
            jitter_amplitude: 0.0,
            ..FailureRiskScorer::default()
        };
        let as_of = Utc::now();
        let mut rng = StdRng::seed_from_u64(1);
        let tr = scorer
            .score(&snapshot(EquipmentKind::Transformer, 20.0, 1), as_of, &mut rng)
            .unwrap();
        let br = scorer
            .score(&snapshot(EquipmentKind::Breaker, 20.0, 1), as_of, &mut rng)
            .unwrap();
        assert!(tr.priority >= br.priority);
        assert!(tr.estimated_cost_usd > br.estimated_cost_usd);
    }

    #[test]
    fn old_equipment_fails_sooner() {
        assert!(days_to_failure(50.0, 25.0) < days_to_failure(50.0, 5.0));
        // Age factor floors at 0.1 and the result never drops below a day.
        assert!(days_to_failure(100.0, 100.0) >= 1.0);
    }

    #[test]
    fn cost_scales_with_risk_tier() {
        let scorer = FailureRiskScorer {
            jitter_amplitude: 0.0,
            ..FailureRiskScorer::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        // Worn transformer: old, long overdue, loaded, hot, many failures.
        let mut eq = snapshot(EquipmentKind::Transformer, 28.0, 5);
        eq.last_maintenance = Utc::now() - Duration::days(900);
        eq.average_load_mw = 98.0;
        let p = scorer.score(&eq, Utc::now(), &mut rng).unwrap();
        assert_eq!(p.risk, RiskLevel::Critical);
        assert_eq!(p.estimated_cost_usd, 50_000.0 * 2.5);
        assert_eq!(p.estimated_downtime_hours, 48.0 * 2.0);
        assert_eq!(p.priority, 10);
    }

    #[test]
    fn fleet_is_sorted_by_priority() {
        let scorer = FailureRiskScorer::default();
        let mut rng = StdRng::seed_from_u64(9);
        let fleet = vec![
            snapshot(EquipmentKind::Capacitor, 2.0, 0),
            snapshot(EquipmentKind::Transformer, 28.0, 5),
            snapshot(EquipmentKind::Breaker, 12.0, 1),
        ];
        let predictions = scorer.score_fleet(&fleet, Utc::now(), &mut rng).unwrap();
        assert_eq!(predictions.len(), 3);
        assert!(predictions.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn empty_fleet_is_a_noop() {
        let scorer = FailureRiskScorer::default();
        let mut rng = StdRng::seed_from_u64(9);
        let predictions = scorer.score_fleet(&[], Utc::now(), &mut rng).unwrap();
        assert!(predictions.is_empty());
    }

    #[test]
    fn zero_max_load_is_rejected() {
        let scorer = FailureRiskScorer::default();
        let mut eq = snapshot(EquipmentKind::Other, 5.0, 0);
        eq.max_load_mw = 0.0;
        let result = scorer.score(&eq, Utc::now(), &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(MaintenanceError::InvalidEquipment { .. })
        ));
    }

    proptest! {
        // Probability stays in [0, 100] and priority in [1, 10] under any
        // extreme-but-valid inputs and any seed.
        #[test]
        fn probability_and_priority_are_clamped(
            age in 0.0f64..1000.0,
            overdue_days in 0i64..20_000,
            hours in 0.0f64..1_000_000.0,
            load_ratio in 0.0f64..50.0,
            temp in -40.0f64..400.0,
            vibration in 0.0f64..500.0,
            failures in 0u32..100,
            seed in any::<u64>(),
        ) {
            let as_of = Utc::now();
            let eq = EquipmentSnapshot {
                id: 1,
                name: "stress".into(),
                kind: EquipmentKind::Transformer,
                age_years: age,
                last_maintenance: as_of - Duration::days(overdue_days),
                operating_hours: hours,
                average_load_mw: load_ratio * 10.0,
                max_load_mw: 10.0,
                temperature_c: temp,
                vibration_mm_s: vibration,
                failure_history: failures,
            };
            let scorer = FailureRiskScorer::default();
            let mut rng = StdRng::seed_from_u64(seed);
            let p = scorer.score(&eq, as_of, &mut rng).unwrap();
            prop_assert!((0.0..=100.0).contains(&p.failure_probability));
            prop_assert!((1..=10).contains(&p.priority));
            prop_assert!(p.estimated_days_to_failure >= 1.0);
        }
    }
}

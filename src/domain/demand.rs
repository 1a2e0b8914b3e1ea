use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One observed hour of system demand.
///
/// Sector breakdowns are optional; only the total feeds the forecasters.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HistoricalDemandPoint {
    pub timestamp: DateTime<Utc>,
    #[validate(range(min = 0.0))]
    pub total_demand_mw: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residential_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industrial_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
}

impl HistoricalDemandPoint {
    /// Bare point with just a timestamp and a total.
    pub fn new(timestamp: DateTime<Utc>, total_demand_mw: f64) -> Self {
        Self {
            timestamp,
            total_demand_mw,
            residential_mw: None,
            commercial_mw: None,
            industrial_mw: None,
            temperature_c: None,
        }
    }
}

/// A single forecast hour with its symmetric confidence band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub predicted_demand_mw: f64,
    pub confidence_lower_mw: f64,
    pub confidence_upper_mw: f64,
    /// Identifier of the model that produced this point.
    pub model: String,
}

impl DemandForecastPoint {
    /// The band must bracket the point estimate.
    pub fn band_is_consistent(&self) -> bool {
        self.confidence_lower_mw <= self.predicted_demand_mw
            && self.predicted_demand_mw <= self.confidence_upper_mw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn negative_demand_fails_validation() {
        let point = HistoricalDemandPoint::new(Utc::now(), -1.0);
        assert!(point.validate().is_err());
    }

    #[test]
    fn band_consistency() {
        let point = DemandForecastPoint {
            timestamp: Utc::now(),
            predicted_demand_mw: 100.0,
            confidence_lower_mw: 90.0,
            confidence_upper_mw: 110.0,
            model: "test".into(),
        };
        assert!(point.band_is_consistent());
    }
}

//! Demand forecasting heuristics.
//!
//! Two deliberately simple models and a fixed-weight blend of both. Neither
//! model is trained; they reproduce the diurnal/weekly shape of SIN demand
//! from the last observed value. The [`DemandPredictor`] trait is the seam
//! where a real trained model would plug in later.

use chrono::{Datelike, Duration, Timelike, Weekday};
use chrono_tz::Tz;
use std::f64::consts::PI;
use tracing::{debug, info};

use super::ForecastError;
use crate::config::ForecastConfig;
use crate::domain::{DemandForecastPoint, HistoricalDemandPoint};

/// A point forecaster over an ordered historical demand series.
///
/// Implementations must return exactly `hours_ahead` points, one per future
/// hour starting right after the last observation, each with
/// `confidence_lower <= predicted <= confidence_upper`.
pub trait DemandPredictor: Send + Sync {
    fn model_name(&self) -> &str;

    fn predict(
        &self,
        history: &[HistoricalDemandPoint],
        hours_ahead: u32,
    ) -> Result<Vec<DemandForecastPoint>, ForecastError>;
}

fn last_observation(
    history: &[HistoricalDemandPoint],
) -> Result<&HistoricalDemandPoint, ForecastError> {
    let last = history.last().ok_or(ForecastError::EmptyHistory)?;
    if last.total_demand_mw < 0.0 {
        return Err(ForecastError::NegativeDemand(last.total_demand_mw));
    }
    Ok(last)
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Hour-of-day profile model.
///
/// Scales the last observed demand by a working-hours sinusoid and a weekend
/// discount. Off-peak hours use a flat damped factor.
#[derive(Debug, Clone)]
pub struct HourlyProfileModel {
    pub timezone: Tz,
    /// First hour of the working-demand window (inclusive).
    pub working_start: u32,
    /// Last hour of the working-demand window (inclusive).
    pub working_end: u32,
    pub off_peak_factor: f64,
    pub weekend_factor: f64,
    /// Relative half-width of the confidence band.
    pub band: f64,
}

impl Default for HourlyProfileModel {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Bogota,
            working_start: 8,
            working_end: 20,
            off_peak_factor: 0.8,
            weekend_factor: 0.85,
            band: 0.10,
        }
    }
}

impl HourlyProfileModel {
    pub fn from_config(cfg: &ForecastConfig) -> Self {
        Self {
            timezone: cfg.timezone,
            band: cfg.profile_band,
            ..Self::default()
        }
    }

    fn hour_factor(&self, hour: u32) -> f64 {
        if (self.working_start..=self.working_end).contains(&hour) {
            let span = (self.working_end - self.working_start) as f64;
            1.2 + ((hour - self.working_start) as f64 / span * PI).sin() * 0.3
        } else {
            self.off_peak_factor
        }
    }
}

impl DemandPredictor for HourlyProfileModel {
    fn model_name(&self) -> &str {
        "hourly-profile-v1"
    }

    fn predict(
        &self,
        history: &[HistoricalDemandPoint],
        hours_ahead: u32,
    ) -> Result<Vec<DemandForecastPoint>, ForecastError> {
        let last = last_observation(history)?;
        let base = last.total_demand_mw;

        let mut out = Vec::with_capacity(hours_ahead as usize);
        for i in 1..=i64::from(hours_ahead) {
            let timestamp = last.timestamp + Duration::hours(i);
            let local = timestamp.with_timezone(&self.timezone);

            let hour_factor = self.hour_factor(local.hour());
            let day_factor = if is_weekend(local.weekday()) {
                self.weekend_factor
            } else {
                1.0
            };

            let predicted = base * hour_factor * day_factor;
            let margin = predicted * self.band;
            out.push(DemandForecastPoint {
                timestamp,
                predicted_demand_mw: predicted,
                confidence_lower_mw: predicted - margin,
                confidence_upper_mw: predicted + margin,
                model: self.model_name().to_string(),
            });
        }

        debug!(points = out.len(), base_mw = base, "hourly-profile forecast");
        Ok(out)
    }
}

/// Trend-plus-seasonality model.
///
/// Estimates a linear trend from the trailing week of data and layers a daily
/// sinusoid and a weekday/weekend step on top.
#[derive(Debug, Clone)]
pub struct TrendSeasonalModel {
    pub timezone: Tz,
    /// Trailing window used for the trend estimate.
    pub lookback_hours: usize,
    pub band: f64,
}

impl Default for TrendSeasonalModel {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Bogota,
            lookback_hours: 168,
            band: 0.12,
        }
    }
}

impl TrendSeasonalModel {
    pub fn from_config(cfg: &ForecastConfig) -> Self {
        Self {
            timezone: cfg.timezone,
            lookback_hours: cfg.trend_lookback_hours,
            band: cfg.trend_band,
        }
    }

    /// Relative change between the first and second half of the window.
    /// Fewer than 2 points (or a zero first-half mean) yields no trend.
    fn trend(&self, history: &[HistoricalDemandPoint]) -> f64 {
        let start = history.len().saturating_sub(self.lookback_hours);
        let recent = &history[start..];
        if recent.len() < 2 {
            return 0.0;
        }

        let (first, second) = recent.split_at(recent.len() / 2);
        let avg = |points: &[HistoricalDemandPoint]| {
            points.iter().map(|p| p.total_demand_mw).sum::<f64>() / points.len() as f64
        };
        let avg_first = avg(first);
        if avg_first.abs() < f64::EPSILON {
            return 0.0;
        }
        (avg(second) - avg_first) / avg_first
    }
}

impl DemandPredictor for TrendSeasonalModel {
    fn model_name(&self) -> &str {
        "trend-seasonal-v1"
    }

    fn predict(
        &self,
        history: &[HistoricalDemandPoint],
        hours_ahead: u32,
    ) -> Result<Vec<DemandForecastPoint>, ForecastError> {
        let last = last_observation(history)?;
        let base = last.total_demand_mw;
        let trend = self.trend(history);

        let mut out = Vec::with_capacity(hours_ahead as usize);
        for i in 1..=i64::from(hours_ahead) {
            let timestamp = last.timestamp + Duration::hours(i);
            let local = timestamp.with_timezone(&self.timezone);

            let trend_component = base * (1.0 + trend * i as f64 / self.lookback_hours as f64);
            let daily = (local.hour() as f64 / 24.0 * 2.0 * PI).sin() * 0.15;
            let weekly = if is_weekend(local.weekday()) {
                -0.15
            } else {
                0.05
            };

            let predicted = trend_component * (1.0 + daily + weekly);
            let margin = predicted.abs() * self.band;
            out.push(DemandForecastPoint {
                timestamp,
                predicted_demand_mw: predicted,
                confidence_lower_mw: predicted - margin,
                confidence_upper_mw: predicted + margin,
                model: self.model_name().to_string(),
            });
        }

        debug!(points = out.len(), trend, "trend-seasonal forecast");
        Ok(out)
    }
}

/// Fixed-weight blend of the two heuristic models.
///
/// Point estimates and band bounds are blended with the same weights, so the
/// band stays consistent around the blended estimate.
pub struct DemandForecastEnsemble {
    profile: Box<dyn DemandPredictor>,
    trend: Box<dyn DemandPredictor>,
    profile_weight: f64,
    trend_weight: f64,
}

impl Default for DemandForecastEnsemble {
    fn default() -> Self {
        Self {
            profile: Box::new(HourlyProfileModel::default()),
            trend: Box::new(TrendSeasonalModel::default()),
            profile_weight: 0.6,
            trend_weight: 0.4,
        }
    }
}

impl DemandForecastEnsemble {
    pub fn from_config(cfg: &ForecastConfig) -> Self {
        Self {
            profile: Box::new(HourlyProfileModel::from_config(cfg)),
            trend: Box::new(TrendSeasonalModel::from_config(cfg)),
            profile_weight: cfg.profile_weight,
            trend_weight: cfg.trend_weight,
        }
    }

    /// Swap in different member models, e.g. a trained predictor.
    pub fn with_members(
        profile: Box<dyn DemandPredictor>,
        trend: Box<dyn DemandPredictor>,
        profile_weight: f64,
        trend_weight: f64,
    ) -> Self {
        Self {
            profile,
            trend,
            profile_weight,
            trend_weight,
        }
    }
}

impl DemandPredictor for DemandForecastEnsemble {
    fn model_name(&self) -> &str {
        "ensemble-v1"
    }

    fn predict(
        &self,
        history: &[HistoricalDemandPoint],
        hours_ahead: u32,
    ) -> Result<Vec<DemandForecastPoint>, ForecastError> {
        let profile = self.profile.predict(history, hours_ahead)?;
        let trend = self.trend.predict(history, hours_ahead)?;

        let blend = |a: f64, b: f64| a * self.profile_weight + b * self.trend_weight;
        let out: Vec<DemandForecastPoint> = profile
            .into_iter()
            .zip(trend)
            .map(|(p, t)| DemandForecastPoint {
                timestamp: p.timestamp,
                predicted_demand_mw: blend(p.predicted_demand_mw, t.predicted_demand_mw),
                confidence_lower_mw: blend(p.confidence_lower_mw, t.confidence_lower_mw),
                confidence_upper_mw: blend(p.confidence_upper_mw, t.confidence_upper_mw),
                model: self.model_name().to_string(),
            })
            .collect();

        info!(
            points = out.len(),
            hours_ahead,
            model = self.model_name(),
            "demand forecast generated"
        );
        Ok(out)
    }
}

use anyhow::Result;
use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

/// Tunables for the analytics calculators.
///
/// Every section has sensible defaults, so the library works without any
/// configuration file. Hosts override via `config/default.toml` or
/// `SIN__<SECTION>__<KEY>` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub forecast: ForecastConfig,
    pub maintenance: MaintenanceConfig,
    pub renewable: RenewableConfig,
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Zone used to resolve hour-of-day and weekday effects. The SIN runs on
    /// Colombian local time, which has no DST.
    pub timezone: Tz,
    /// Ensemble weight of the hourly-profile model.
    pub profile_weight: f64,
    /// Ensemble weight of the trend-seasonal model.
    pub trend_weight: f64,
    /// Relative half-width of the hourly-profile confidence band.
    pub profile_band: f64,
    /// Relative half-width of the trend-seasonal confidence band.
    pub trend_band: f64,
    /// Trailing window the trend estimate is computed over.
    pub trend_lookback_hours: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Bogota,
            profile_weight: 0.6,
            trend_weight: 0.4,
            profile_band: 0.10,
            trend_band: 0.12,
            trend_lookback_hours: 168,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Half-width of the uniform jitter added to the failure probability.
    pub jitter_amplitude: f64,
    /// Steepness of the logistic squash applied to the feature score.
    pub sigmoid_gain: f64,
    /// Feature score mapped to 50% failure probability.
    pub sigmoid_midpoint: f64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            jitter_amplitude: 2.5,
            sigmoid_gain: 5.0,
            sigmoid_midpoint: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenewableConfig {
    pub timezone: Tz,
    /// First local hour with usable irradiance.
    pub daylight_start_hour: u32,
    /// Last local hour with usable irradiance.
    pub daylight_end_hour: u32,
    /// Generation lost under full cloud cover (fraction).
    pub cloud_attenuation: f64,
    /// Panel derating starts above this cell temperature.
    pub derate_above_c: f64,
    pub cut_in_ms: f64,
    pub rated_ms: f64,
    pub cut_out_ms: f64,
}

impl Default for RenewableConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Bogota,
            daylight_start_hour: 6,
            daylight_end_hour: 18,
            cloud_attenuation: 0.7,
            derate_above_c: 25.0,
            cut_in_ms: 3.0,
            rated_ms: 12.0,
            cut_out_ms: 25.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Line utilization above which a redistribute recommendation fires.
    pub overload_threshold: f64,
    /// Load-factor standard deviation above which the grid counts as imbalanced.
    pub imbalance_threshold: f64,
    /// Per-line I^2*R loss (heuristic units) above which voltage adjustment fires.
    pub line_loss_threshold: f64,
    /// Renewable nodes below this utilization get a dispatch-increase recommendation.
    pub renewable_floor: f64,
    pub nominal_voltage_kv: f64,
    /// Allowed relative voltage deviation before control action.
    pub voltage_tolerance: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            overload_threshold: 0.9,
            imbalance_threshold: 0.2,
            line_loss_threshold: 10.0,
            renewable_floor: 0.7,
            nominal_voltage_kv: 220.0,
            voltage_tolerance: 0.05,
        }
    }
}

impl AnalyticsConfig {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("SIN__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_consistent() {
        let cfg = AnalyticsConfig::default();
        assert!((cfg.forecast.profile_weight + cfg.forecast.trend_weight - 1.0).abs() < 1e-9);
        assert_eq!(cfg.forecast.timezone, chrono_tz::America::Bogota);
        assert!(cfg.renewable.cut_in_ms < cfg.renewable.rated_ms);
        assert!(cfg.renewable.rated_ms < cfg.renewable.cut_out_ms);
        assert!(cfg.optimizer.overload_threshold > cfg.optimizer.renewable_floor);
    }
}

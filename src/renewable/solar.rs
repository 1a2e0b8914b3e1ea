//! Solar generation forecasting.
//!
//! A clear-sky sinusoid over the daylight window, attenuated by cloud cover
//! and derated at high cell temperatures. Uncertainty widens with cloud
//! cover, since overcast output is the hardest to pin down.

use chrono_tz::Tz;
use std::f64::consts::PI;
use tracing::debug;

use super::{validate_source, GenerationError};
use crate::config::RenewableConfig;
use crate::domain::{GenerationForecastPoint, RenewableSource, WeatherSample};

#[derive(Debug, Clone)]
pub struct SolarForecaster {
    pub timezone: Tz,
    /// First daylight hour (inclusive, local time).
    pub daylight_start: u32,
    /// Last daylight hour (inclusive, local time).
    pub daylight_end: u32,
    /// Output fraction lost under full cloud cover.
    pub cloud_attenuation: f64,
    /// Cell temperature above which derating starts.
    pub derate_above_c: f64,
    /// Base relative half-width of the confidence band.
    pub base_band: f64,
}

impl Default for SolarForecaster {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Bogota,
            daylight_start: 6,
            daylight_end: 18,
            cloud_attenuation: 0.7,
            derate_above_c: 25.0,
            base_band: 0.10,
        }
    }
}

impl SolarForecaster {
    pub fn from_config(cfg: &RenewableConfig) -> Self {
        Self {
            timezone: cfg.timezone,
            daylight_start: cfg.daylight_start_hour,
            daylight_end: cfg.daylight_end_hour,
            cloud_attenuation: cfg.cloud_attenuation,
            derate_above_c: cfg.derate_above_c,
            base_band: 0.10,
        }
    }

    /// One forecast point per weather sample, capped at `hours_ahead`.
    pub fn forecast(
        &self,
        source: &RenewableSource,
        weather: &[WeatherSample],
        hours_ahead: usize,
    ) -> Result<Vec<GenerationForecastPoint>, GenerationError> {
        validate_source(source)?;

        let points = weather
            .iter()
            .take(hours_ahead)
            .map(|sample| self.forecast_point(source, sample))
            .collect::<Vec<_>>();

        debug!(
            source_id = source.id,
            points = points.len(),
            "solar generation forecast"
        );
        Ok(points)
    }

    fn forecast_point(
        &self,
        source: &RenewableSource,
        sample: &WeatherSample,
    ) -> GenerationForecastPoint {
        use chrono::Timelike;
        let hour = sample.timestamp.with_timezone(&self.timezone).hour();

        let solar_factor = if (self.daylight_start..=self.daylight_end).contains(&hour) {
            let span = (self.daylight_end - self.daylight_start) as f64;
            ((hour - self.daylight_start) as f64 / span * PI).sin()
        } else {
            0.0
        };
        let cloud_factor =
            1.0 - sample.cloud_cover_percent / 100.0 * self.cloud_attenuation;
        let temp_factor =
            1.0 - ((sample.temperature_c - self.derate_above_c) / 100.0).max(0.0);

        let predicted = (source.capacity_mw
            * solar_factor
            * cloud_factor
            * temp_factor
            * source.efficiency_percent
            / 100.0)
            .max(0.0);
        let margin = predicted * (self.base_band + sample.cloud_cover_percent / 200.0);

        GenerationForecastPoint {
            source_id: source.id,
            timestamp: sample.timestamp,
            predicted_power_mw: predicted,
            confidence_lower_mw: (predicted - margin).max(0.0),
            confidence_upper_mw: predicted + margin,
            conditions: describe_conditions(sample),
        }
    }
}

fn describe_conditions(sample: &WeatherSample) -> String {
    let sky = if sample.cloud_cover_percent < 20.0 {
        "clear"
    } else if sample.cloud_cover_percent < 50.0 {
        "partly cloudy"
    } else {
        "overcast"
    };
    if sample.temperature_c > 30.0 {
        format!("{sky}, hot")
    } else if sample.temperature_c < 10.0 {
        format!("{sky}, cold")
    } else {
        sky.to_string()
    }
}

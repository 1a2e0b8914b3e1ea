//! Wind generation forecasting.
//!
//! Standard turbine power curve: nothing below cut-in, a cubic ramp up to
//! rated speed, flat output to cut-out, and a hard stop beyond it.
//! Uncertainty grows with distance from rated speed, where the curve is
//! steepest or the cut-out risk looms.

use tracing::debug;

use super::{validate_source, GenerationError};
use crate::config::RenewableConfig;
use crate::domain::{GenerationForecastPoint, RenewableSource, WeatherSample};

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

#[derive(Debug, Clone)]
pub struct WindForecaster {
    /// Minimum speed that turns the rotor, m/s.
    pub cut_in_ms: f64,
    /// Speed reaching nameplate output, m/s.
    pub rated_ms: f64,
    /// Safety shutdown speed, m/s.
    pub cut_out_ms: f64,
    /// Base relative half-width of the confidence band.
    pub base_band: f64,
}

impl Default for WindForecaster {
    fn default() -> Self {
        Self {
            cut_in_ms: 3.0,
            rated_ms: 12.0,
            cut_out_ms: 25.0,
            base_band: 0.15,
        }
    }
}

impl WindForecaster {
    pub fn from_config(cfg: &RenewableConfig) -> Self {
        Self {
            cut_in_ms: cfg.cut_in_ms,
            rated_ms: cfg.rated_ms,
            cut_out_ms: cfg.cut_out_ms,
            base_band: 0.15,
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
            "wind generation forecast"
        );
        Ok(points)
    }

    /// Fraction of nameplate output at a given wind speed.
    pub fn power_factor(&self, wind_speed_ms: f64) -> f64 {
        if wind_speed_ms < self.cut_in_ms || wind_speed_ms > self.cut_out_ms {
            0.0
        } else if wind_speed_ms < self.rated_ms {
            ((wind_speed_ms - self.cut_in_ms) / (self.rated_ms - self.cut_in_ms)).powi(3)
        } else {
            1.0
        }
    }

    fn forecast_point(
        &self,
        source: &RenewableSource,
        sample: &WeatherSample,
    ) -> GenerationForecastPoint {
        let speed = sample.wind_speed_ms;
        let predicted =
            source.capacity_mw * self.power_factor(speed) * source.efficiency_percent / 100.0;
        let margin = predicted * (self.base_band + (speed - self.rated_ms).abs() / 50.0);

        GenerationForecastPoint {
            source_id: source.id,
            timestamp: sample.timestamp,
            predicted_power_mw: predicted,
            confidence_lower_mw: (predicted - margin).max(0.0),
            confidence_upper_mw: predicted + margin,
            conditions: format!(
                "wind {:.0} m/s from {}",
                speed,
                compass(sample.wind_direction_deg)
            ),
        }
    }
}

fn compass(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round() as usize % COMPASS.len();
    COMPASS[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn source(capacity: f64, efficiency: f64) -> RenewableSource {
        RenewableSource {
            id: 4,
            node_id: 40,
            kind: crate::domain::SourceKind::Wind,
            capacity_mw: capacity,
            current_generation_mw: 0.0,
            efficiency_percent: efficiency,
        }
    }

    fn windy(speed: f64) -> WeatherSample {
        WeatherSample {
            wind_speed_ms: speed,
            wind_direction_deg: 45.0,
            ..WeatherSample::clear(Utc::now(), 20.0)
        }
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(2.9, 0.0)] // below cut-in
    #[case(3.0, 0.0)] // cubic ramp starts at zero
    #[case(12.0, 1.0)] // rated
    #[case(20.0, 1.0)] // plateau
    #[case(25.0, 1.0)] // still at cut-out
    #[case(25.1, 0.0)] // beyond cut-out
    #[case(30.0, 0.0)]
    fn power_curve_endpoints(#[case] speed: f64, #[case] expected: f64) {
        let forecaster = WindForecaster::default();
        assert_eq!(forecaster.power_factor(speed), expected, "at {speed} m/s");
    }

    #[test]
    fn ramp_is_cubic() {
        let forecaster = WindForecaster::default();
        // Halfway between cut-in and rated: (0.5)^3.
        assert!((forecaster.power_factor(7.5) - 0.125).abs() < 1e-9);
    }

    #[test]
    fn rated_wind_yields_capacity_times_efficiency() {
        let forecaster = WindForecaster::default();
        let points = forecaster
            .forecast(&source(150.0, 80.0), &[windy(14.0)], 24)
            .unwrap();
        assert!((points[0].predicted_power_mw - 120.0).abs() < 1e-9);
    }

    #[test]
    fn band_widens_away_from_rated_speed() {
        let forecaster = WindForecaster::default();
        let src = source(100.0, 100.0);
        let near = forecaster.forecast(&src, &[windy(12.0)], 24).unwrap();
        let far = forecaster.forecast(&src, &[windy(24.0)], 24).unwrap();
        let rel = |p: &GenerationForecastPoint| {
            (p.confidence_upper_mw - p.predicted_power_mw) / p.predicted_power_mw
        };
        assert!(rel(&far[0]) > rel(&near[0]));
    }

    #[test]
    fn conditions_carry_speed_and_direction() {
        let forecaster = WindForecaster::default();
        let points = forecaster
            .forecast(&source(100.0, 100.0), &[windy(8.0)], 24)
            .unwrap();
        assert_eq!(points[0].conditions, "wind 8 m/s from NE");
    }

    #[rstest]
    #[case(0.0, "N")]
    #[case(90.0, "E")]
    #[case(180.0, "S")]
    #[case(270.0, "W")]
    #[case(359.0, "N")] // wraps around
    fn compass_rose(#[case] degrees: f64, #[case] expected: &str) {
        assert_eq!(compass(degrees), expected);
    }
}

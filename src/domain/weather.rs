use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One sample of a weather forecast series.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub cloud_cover_percent: f64,
    #[validate(range(min = 0.0))]
    pub wind_speed_ms: f64,
    /// Meteorological wind direction in degrees, 0 = North.
    #[validate(range(min = 0.0, max = 360.0))]
    pub wind_direction_deg: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_percent: f64,
    #[validate(range(min = 0.0))]
    pub precipitation_mm: f64,
}

impl WeatherSample {
    /// Clear-sky sample, useful as a test fixture baseline.
    pub fn clear(timestamp: DateTime<Utc>, temperature_c: f64) -> Self {
        Self {
            timestamp,
            temperature_c,
            cloud_cover_percent: 0.0,
            wind_speed_ms: 0.0,
            wind_direction_deg: 0.0,
            humidity_percent: 50.0,
            precipitation_mm: 0.0,
        }
    }
}

//! Forecast accuracy metrics.
//!
//! Used by the host service to score stored predictions once actuals arrive.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Accuracy summary for one forecast/actual pair of series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean square error.
    pub rmse: f64,
    /// Mean absolute percentage error, in percent. Zero actuals are skipped.
    pub mape: f64,
    /// Coefficient of determination.
    pub r2: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("series length mismatch: actual={actual}, predicted={predicted}")]
    DimensionMismatch { actual: usize, predicted: usize },

    #[error("cannot compute metrics over empty series")]
    EmptyData,
}

impl ForecastMetrics {
    pub fn calculate(actual: &[f64], predicted: &[f64]) -> Result<Self, MetricsError> {
        if actual.len() != predicted.len() {
            return Err(MetricsError::DimensionMismatch {
                actual: actual.len(),
                predicted: predicted.len(),
            });
        }
        if actual.is_empty() {
            return Err(MetricsError::EmptyData);
        }

        let n = actual.len() as f64;
        let mut abs_sum = 0.0;
        let mut sq_sum = 0.0;
        let mut pct_sum = 0.0;
        let mut pct_count = 0usize;

        for (a, p) in actual.iter().zip(predicted) {
            let error = a - p;
            abs_sum += error.abs();
            sq_sum += error * error;
            if a.abs() > 1e-6 {
                pct_sum += (error.abs() / a.abs()) * 100.0;
                pct_count += 1;
            }
        }

        let mean_actual = actual.iter().sum::<f64>() / n;
        let total_variance: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
        let r2 = if total_variance > 1e-10 {
            1.0 - sq_sum / total_variance
        } else {
            0.0
        };

        Ok(Self {
            mae: abs_sum / n,
            rmse: (sq_sum / n).sqrt(),
            mape: if pct_count > 0 {
                pct_sum / pct_count as f64
            } else {
                0.0
            },
            r2,
            sample_count: actual.len(),
        })
    }

    /// MAPE-based quality bucket.
    pub fn quality(&self) -> ForecastQuality {
        match self.mape {
            m if m < 5.0 => ForecastQuality::Excellent,
            m if m < 10.0 => ForecastQuality::Good,
            m if m < 20.0 => ForecastQuality::Fair,
            _ => ForecastQuality::Poor,
        }
    }
}

impl fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MAE={:.3} RMSE={:.3} MAPE={:.2}% R2={:.3} ({:?})",
            self.mae,
            self.rmse,
            self.mape,
            self.r2,
            self.quality()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

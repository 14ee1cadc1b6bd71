//! Forecast accuracy evaluation against held-out actuals.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Aggregate error metrics between forecasts and held-out actuals.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationMetrics {
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
}

/// One aligned forecast step next to its observed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastComparison {
    pub timestamp: DateTime<Utc>,
    pub actual: f64,
    pub lower: f64,
    pub forecast: f64,
    pub upper: f64,
}

/// Compute MAE and RMSE over the aligned prefix of actuals and forecast.
///
/// The first `min(horizon, actuals.len())` positions are compared; excess
/// on either side is dropped silently.
pub fn evaluate(actuals: &TimeSeries, forecast: &Forecast) -> Result<EvaluationMetrics> {
    let n = actuals.len().min(forecast.horizon());
    if n == 0 {
        return Err(ForecastError::EmptyEvaluationSet);
    }

    let errors = actuals.values()[..n]
        .iter()
        .zip(forecast.point()[..n].iter())
        .map(|(actual, predicted)| actual - predicted);

    let mae = errors.clone().map(f64::abs).sum::<f64>() / n as f64;
    let rmse = (errors.map(|e| e * e).sum::<f64>() / n as f64).sqrt();

    Ok(EvaluationMetrics { mae, rmse })
}

/// Build the per-step comparison table over the aligned prefix, with
/// timestamps taken from the actuals.
pub fn comparison(actuals: &TimeSeries, forecast: &Forecast) -> Vec<ForecastComparison> {
    let n = actuals.len().min(forecast.horizon());
    (0..n)
        .map(|i| ForecastComparison {
            timestamp: actuals.timestamps()[i],
            actual: actuals.values()[i],
            lower: forecast.lower()[i],
            forecast: forecast.point()[i],
            upper: forecast.upper()[i],
        })
        .collect()
}

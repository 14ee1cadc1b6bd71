//! Forecast result structure for holding predictions.

use crate::error::{ForecastError, Result};

/// A forecast result: point predictions with confidence bounds.
///
/// The three value arrays always have the same length (the horizon) and
/// the bounds always satisfy `lower[i] <= point[i] <= upper[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    point: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    level: f64,
}

impl Forecast {
    /// Create a forecast from point predictions and interval bounds.
    pub fn with_intervals(
        point: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        level: f64,
    ) -> Result<Self> {
        if lower.len() != point.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: point.len(),
                got: lower.len(),
            });
        }
        if upper.len() != point.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: point.len(),
                got: upper.len(),
            });
        }
        Ok(Self {
            point,
            lower,
            upper,
            level,
        })
    }

    /// Create an empty forecast (horizon zero) at the given level.
    pub fn empty(level: f64) -> Self {
        Self {
            point: Vec::new(),
            lower: Vec::new(),
            upper: Vec::new(),
            level,
        }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if the forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Get point predictions.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Get lower interval bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Get upper interval bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Get the confidence level the bounds were computed at.
    pub fn level(&self) -> f64 {
        self.level
    }
}

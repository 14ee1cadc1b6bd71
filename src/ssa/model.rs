//! Training configuration, the trained model snapshot, and forecasting.

use crate::core::{Forecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::ssa::recurrence::LinearRecurrentFormula;
use crate::ssa::subspace::{RankSelection, SignalSubspace};
use crate::ssa::trajectory::trajectory_matrix;
use statrs::distribution::{ContinuousCDF, Normal};

/// Configuration for SSA training.
///
/// `train_size` is the length of the training segment taken from the start
/// of the input series; `series_length` is the length of its most recent
/// sub-series used to build the trajectory matrix; `window_size` is the
/// embedding window `L`.
#[derive(Debug, Clone, PartialEq)]
pub struct SsaConfig {
    pub window_size: usize,
    pub series_length: usize,
    pub train_size: usize,
    pub rank: RankSelection,
    /// Clamp lower confidence bounds at zero (the series is a count).
    pub non_negative: bool,
}

impl SsaConfig {
    /// Create a configuration with a fixed signal rank.
    pub fn new(
        window_size: usize,
        series_length: usize,
        train_size: usize,
        rank: usize,
    ) -> Result<Self> {
        if window_size < 2 {
            return Err(ForecastError::InvalidParameter(
                "window size must be at least 2".to_string(),
            ));
        }
        if rank == 0 {
            return Err(ForecastError::InvalidParameter(
                "rank must be at least 1".to_string(),
            ));
        }
        if rank >= window_size {
            return Err(ForecastError::InvalidParameter(format!(
                "rank {} must be less than window size {}",
                rank, window_size
            )));
        }
        Ok(Self {
            window_size,
            series_length,
            train_size,
            rank: RankSelection::Fixed(rank),
            non_negative: true,
        })
    }

    /// Create a configuration selecting rank by cumulative energy.
    pub fn with_energy_threshold(
        window_size: usize,
        series_length: usize,
        train_size: usize,
        threshold: f64,
    ) -> Result<Self> {
        if window_size < 2 {
            return Err(ForecastError::InvalidParameter(
                "window size must be at least 2".to_string(),
            ));
        }
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "energy threshold {} must be in (0, 1]",
                threshold
            )));
        }
        Ok(Self {
            window_size,
            series_length,
            train_size,
            rank: RankSelection::EnergyThreshold(threshold),
            non_negative: true,
        })
    }

    /// Set whether lower confidence bounds are clamped at zero.
    pub fn with_non_negative(mut self, non_negative: bool) -> Self {
        self.non_negative = non_negative;
        self
    }
}

/// An immutable trained SSA model.
///
/// Owns the signal subspace, the recurrence, and the trailing buffer of the
/// last `L - 1` training values that seeds future recurrence steps. All
/// methods take `&self`; resuming after new observations goes through
/// [`TrainedModel::advance`], which returns a new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    subspace: SignalSubspace,
    lrf: LinearRecurrentFormula,
    buffer: Vec<f64>,
    residual_sigma: f64,
    window_size: usize,
    non_negative: bool,
}

/// Train an SSA model on a series.
///
/// The training segment is the first `train_size` values; the trajectory
/// matrix is built over that segment's most recent `series_length` values.
/// Residual sigma is the root mean squared one-step-ahead error of the
/// derived recurrence replayed over the whole training segment.
pub fn train(series: &TimeSeries, config: &SsaConfig) -> Result<TrainedModel> {
    if series.len() < config.train_size {
        return Err(ForecastError::InsufficientData {
            needed: config.train_size,
            got: series.len(),
        });
    }
    if config.train_size < config.series_length {
        return Err(ForecastError::InsufficientData {
            needed: config.series_length,
            got: config.train_size,
        });
    }
    if config.series_length <= config.window_size {
        return Err(ForecastError::InsufficientData {
            needed: config.window_size + 1,
            got: config.series_length,
        });
    }

    let window = config.window_size;
    let segment = &series.values()[..config.train_size];
    let sub_series = &segment[config.train_size - config.series_length..];

    let matrix = trajectory_matrix(sub_series, window)?;
    let subspace = SignalSubspace::decompose(&matrix, config.rank)?;
    let lrf = LinearRecurrentFormula::derive(&subspace)?;

    // One-step-ahead replay over the training segment.
    let order = window - 1;
    let mut squared_error_sum = 0.0;
    let mut count = 0usize;
    for t in order..segment.len() {
        let predicted = lrf.apply(&segment[t - order..t]);
        let error = segment[t] - predicted;
        squared_error_sum += error * error;
        count += 1;
    }
    let residual_sigma = (squared_error_sum / count as f64).sqrt();

    let buffer = segment[segment.len() - order..].to_vec();

    Ok(TrainedModel {
        subspace,
        lrf,
        buffer,
        residual_sigma,
        window_size: window,
        non_negative: config.non_negative,
    })
}

impl TrainedModel {
    /// Forecast `horizon` steps ahead with bounds at the given confidence
    /// level.
    ///
    /// The recurrence is strictly sequential: each step consumes the
    /// previous step's output. Bounds at step `k` (1-based) are
    /// `point ± z(c) * sigma * sqrt(k)`.
    pub fn forecast(&self, horizon: usize, confidence: f64) -> Result<Forecast> {
        if !confidence.is_finite() || confidence <= 0.0 || confidence >= 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level {} must be in (0, 1)",
                confidence
            )));
        }

        let order = self.window_size - 1;
        if self.buffer.len() != order || self.lrf.order() != order {
            return Err(ForecastError::ModelNotTrained);
        }

        if horizon == 0 {
            return Ok(Forecast::empty(confidence));
        }

        let normal = Normal::new(0.0, 1.0).unwrap();
        let z = normal.inverse_cdf((1.0 + confidence) / 2.0);

        let mut working = self.buffer.clone();
        let mut point = Vec::with_capacity(horizon);
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);

        for k in 1..=horizon {
            let next = self.lrf.apply(&working[working.len() - order..]);
            working.push(next);

            let se = self.residual_sigma * (k as f64).sqrt();
            let mut lo = next - z * se;
            let hi = next + z * se;
            if self.non_negative {
                // The clamp never lifts the lower bound above the point.
                lo = lo.max(0.0).min(next);
            }
            point.push(next);
            lower.push(lo);
            upper.push(hi);
        }

        Forecast::with_intervals(point, lower, upper, confidence)
    }

    /// Return a new model whose trailing buffer has absorbed the given
    /// observed values, for resuming forecasts after new data arrives.
    pub fn advance(&self, observations: &[f64]) -> TrainedModel {
        let order = self.window_size - 1;
        let mut combined = self.buffer.clone();
        combined.extend_from_slice(observations);
        let start = combined.len().saturating_sub(order);

        TrainedModel {
            buffer: combined[start..].to_vec(),
            ..self.clone()
        }
    }

    /// The embedding window size `L`.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// The retained signal rank.
    pub fn rank(&self) -> usize {
        self.subspace.rank()
    }

    /// The signal subspace.
    pub fn subspace(&self) -> &SignalSubspace {
        &self.subspace
    }

    /// The linear recurrent formula.
    pub fn lrf(&self) -> &LinearRecurrentFormula {
        &self.lrf
    }

    /// The trailing buffer of the last `L - 1` values.
    pub fn trailing_buffer(&self) -> &[f64] {
        &self.buffer
    }

    /// The one-step residual standard deviation.
    pub fn residual_sigma(&self) -> f64 {
        self.residual_sigma
    }

    /// Whether lower bounds are clamped at zero.
    pub fn non_negative(&self) -> bool {
        self.non_negative
    }

    pub(crate) fn from_parts(
        subspace: SignalSubspace,
        lrf: LinearRecurrentFormula,
        buffer: Vec<f64>,
        residual_sigma: f64,
        window_size: usize,
        non_negative: bool,
    ) -> Self {
        Self {
            subspace,
            lrf,
            buffer,
            residual_sigma,
            window_size,
            non_negative,
        }
    }
}

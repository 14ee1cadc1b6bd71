//! # ssa-forecast
//!
//! Singular spectrum analysis (SSA) forecasting engine for univariate
//! demand series.
//!
//! The pipeline is explicit end to end: a historical series is embedded
//! into a trajectory matrix, decomposed into a low-rank signal subspace,
//! a linear recurrent formula is derived from that subspace, and the
//! recurrence is applied recursively to produce multi-step forecasts with
//! Gaussian confidence bounds. Forecast accuracy is scored against
//! held-out data (MAE, RMSE), and trained models can be checkpointed and
//! reloaded without retraining.

pub mod checkpoint;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod source;
pub mod ssa;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::checkpoint::{
        load_checkpoint, load_checkpoint_file, save_checkpoint, save_checkpoint_file,
    };
    pub use crate::core::{Forecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::evaluation::{comparison, evaluate, EvaluationMetrics, ForecastComparison};
    pub use crate::source::{split_by_period, DemandRecord};
    pub use crate::ssa::{train, RankSelection, SsaConfig, TrainedModel};
}

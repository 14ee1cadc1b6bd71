//! Singular spectrum analysis: trajectory embedding, subspace extraction,
//! recurrence derivation, and recursive forecasting.
//!
//! The pipeline is explicit so each stage can be inspected and tested on
//! its own: a Hankel trajectory matrix is decomposed into a low-rank
//! signal subspace, a linear recurrent formula is derived from that
//! subspace, and the recurrence is applied step by step to extrapolate
//! the series.

mod model;
mod recurrence;
mod subspace;
mod trajectory;

pub use model::{train, SsaConfig, TrainedModel};
pub use recurrence::LinearRecurrentFormula;
pub use subspace::{RankSelection, SignalSubspace};

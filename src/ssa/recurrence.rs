//! Linear recurrent formula derivation from a signal subspace.

use crate::error::{ForecastError, Result};
use crate::ssa::subspace::SignalSubspace;

/// Denominators at or below this are treated as a verticality violation.
const VERTICALITY_EPSILON: f64 = 1e-9;

/// Coefficients of the linear recurrence extrapolating the subspace.
///
/// Stored chronologically: `next = sum(coefficients[j] * window[j])` where
/// `window` holds the most recent `L - 1` values oldest-first.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRecurrentFormula {
    coefficients: Vec<f64>,
}

impl LinearRecurrentFormula {
    /// Derive the recurrence from the signal subspace.
    ///
    /// With `pi_i` the last component of basis vector `i` and `P_i` its
    /// first `L - 1` components, the coefficients are
    /// `sum(pi_i * P_i) / (1 - nu2)` where `nu2 = sum(pi_i^2)`. A
    /// denominator within epsilon of zero means the recurrence is
    /// numerically unstable and is rejected.
    pub fn derive(subspace: &SignalSubspace) -> Result<Self> {
        let window = subspace.window_size();
        if window < 2 || subspace.rank() == 0 {
            return Err(ForecastError::DegenerateSubspace(
                "subspace has no usable components".to_string(),
            ));
        }

        let mut nu2 = 0.0;
        for vector in subspace.basis() {
            let pi = vector[window - 1];
            nu2 += pi * pi;
        }

        let denominator = 1.0 - nu2;
        if denominator <= VERTICALITY_EPSILON {
            return Err(ForecastError::Verticality { denominator });
        }

        let mut coefficients = vec![0.0; window - 1];
        for vector in subspace.basis() {
            let pi = vector[window - 1];
            for (j, coefficient) in coefficients.iter_mut().enumerate() {
                *coefficient += pi * vector[j];
            }
        }
        for coefficient in coefficients.iter_mut() {
            *coefficient /= denominator;
        }

        Ok(Self { coefficients })
    }

    /// Apply the recurrence to a window of the last `L - 1` values
    /// (oldest-first), producing the next value.
    pub fn apply(&self, window: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(window.iter())
            .map(|(c, v)| c * v)
            .sum()
    }

    /// Number of coefficients (`L - 1`).
    pub fn order(&self) -> usize {
        self.coefficients.len()
    }

    /// The coefficient vector, chronological order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Rebuild a formula from previously extracted coefficients.
    pub(crate) fn from_coefficients(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }
}

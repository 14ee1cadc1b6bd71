//! Signal subspace extraction via singular value decomposition.

use crate::error::{ForecastError, Result};
use nalgebra::DMatrix;

/// Singular values below this fraction of the largest are treated as zero.
const ZERO_ENERGY_TOLERANCE: f64 = 1e-12;

/// Iteration cap for the SVD; exceeding it is reported as non-convergence.
const SVD_MAX_ITERATIONS: usize = 1000;

/// How the number of retained components is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankSelection {
    /// Keep exactly this many leading components.
    Fixed(usize),
    /// Keep the smallest number of leading components whose cumulative
    /// squared-singular-value energy reaches this fraction of the total.
    EnergyThreshold(f64),
}

/// The leading left singular vectors and values of a trajectory matrix.
///
/// Each basis vector has length `L` (the window size); singular values are
/// ordered descending. The retained rank `r` satisfies `1 <= r < L`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSubspace {
    basis: Vec<Vec<f64>>,
    singular_values: Vec<f64>,
}

impl SignalSubspace {
    /// Decompose a trajectory matrix and retain the leading components.
    pub(crate) fn decompose(matrix: &DMatrix<f64>, selection: RankSelection) -> Result<Self> {
        let window = matrix.nrows();
        let available = matrix.nrows().min(matrix.ncols());

        let svd = nalgebra::SVD::try_new(
            matrix.clone(),
            true,
            false,
            f64::EPSILON,
            SVD_MAX_ITERATIONS,
        )
        .ok_or_else(|| {
            ForecastError::DegenerateSubspace("decomposition did not converge".to_string())
        })?;

        let u = svd.u.ok_or_else(|| {
            ForecastError::DegenerateSubspace("left singular vectors unavailable".to_string())
        })?;

        // Order components by singular value, largest first.
        let mut order: Vec<usize> = (0..svd.singular_values.len()).collect();
        order.sort_by(|&a, &b| {
            svd.singular_values[b]
                .partial_cmp(&svd.singular_values[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let largest = svd.singular_values[order[0]];
        if !largest.is_finite() || largest <= 0.0 {
            return Err(ForecastError::DegenerateSubspace(
                "all singular values are zero".to_string(),
            ));
        }

        let significant = order
            .iter()
            .filter(|&&i| svd.singular_values[i] > largest * ZERO_ENERGY_TOLERANCE)
            .count();

        let rank = match selection {
            RankSelection::Fixed(r) => {
                if r > available {
                    return Err(ForecastError::DegenerateSubspace(format!(
                        "rank {} exceeds the {} available components",
                        r, available
                    )));
                }
                r
            }
            RankSelection::EnergyThreshold(threshold) => {
                let total: f64 = order
                    .iter()
                    .map(|&i| svd.singular_values[i] * svd.singular_values[i])
                    .sum();
                let mut cumulative = 0.0;
                let mut r = 0;
                for &i in &order {
                    cumulative += svd.singular_values[i] * svd.singular_values[i];
                    r += 1;
                    if cumulative / total >= threshold {
                        break;
                    }
                }
                // Rank must leave room for the recurrence derivation.
                r.min(significant).min(window - 1).max(1)
            }
        };

        let mut basis = Vec::with_capacity(rank);
        let mut singular_values = Vec::with_capacity(rank);
        for &i in order.iter().take(rank) {
            basis.push(u.column(i).iter().copied().collect());
            singular_values.push(svd.singular_values[i]);
        }

        Ok(Self {
            basis,
            singular_values,
        })
    }

    /// Number of retained components.
    pub fn rank(&self) -> usize {
        self.basis.len()
    }

    /// Length of each basis vector (the window size `L`).
    pub fn window_size(&self) -> usize {
        self.basis.first().map(|v| v.len()).unwrap_or(0)
    }

    /// Retained basis vectors, leading component first.
    pub fn basis(&self) -> &[Vec<f64>] {
        &self.basis
    }

    /// Retained singular values, descending.
    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Rebuild a subspace from previously extracted parts.
    pub(crate) fn from_parts(basis: Vec<Vec<f64>>, singular_values: Vec<f64>) -> Self {
        Self {
            basis,
            singular_values,
        }
    }
}

//! Trajectory matrix construction (Hankel embedding).

use crate::error::{ForecastError, Result};
use nalgebra::DMatrix;

/// Build the `L x K` trajectory matrix over a sub-series of length `N`.
///
/// Column `j` is the window `values[j..j + window]`, so `K = N - L + 1`
/// and entry `(i, j) = values[i + j]`. The matrix is ephemeral: it exists
/// only as input to the decomposition.
pub(crate) fn trajectory_matrix(values: &[f64], window: usize) -> Result<DMatrix<f64>> {
    if window < 2 {
        return Err(ForecastError::InvalidParameter(
            "window size must be at least 2".to_string(),
        ));
    }
    if values.len() <= window {
        return Err(ForecastError::InsufficientData {
            needed: window + 1,
            got: values.len(),
        });
    }

    let k = values.len() - window + 1;
    Ok(DMatrix::from_fn(window, k, |i, j| values[i + j]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_hankel_layout() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let m = trajectory_matrix(&values, 3).unwrap();

        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 3);
        // Column j is the window starting at j.
        let column = |j: usize| m.column(j).iter().copied().collect::<Vec<f64>>();
        assert_eq!(column(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(column(1), vec![2.0, 3.0, 4.0]);
        assert_eq!(column(2), vec![3.0, 4.0, 5.0]);
        // Anti-diagonal (Hankel) structure: (i, j) depends only on i + j.
        assert_eq!(m[(2, 0)], m[(1, 1)]);
        assert_eq!(m[(1, 1)], m[(0, 2)]);
    }

    #[test]
    fn rejects_series_not_longer_than_window() {
        let err = trajectory_matrix(&[1.0, 2.0, 3.0], 3).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientData { needed: 4, got: 3 });
    }

    #[test]
    fn rejects_degenerate_window() {
        let err = trajectory_matrix(&[1.0, 2.0, 3.0], 1).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
    }
}

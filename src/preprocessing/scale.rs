//! Standard scaling (z-score normalization) of the encoded feature matrix.
//!
//! Per-column mean and population standard deviation (ddof = 0) are computed
//! from the training matrix only, after imputation and encoding. A constant
//! training column has std = 0; its std is substituted with 1 at fit time so
//! the column passes through centered, and the same substituted value is
//! used at inference time. This is the one documented zero-variance policy
//! in the crate.

use crate::error::{Result, TabularError};
use ndarray::{Array1, Array2, Axis};

/// Unfitted standard scaler.
#[derive(Clone, Debug, Default)]
pub struct StandardScaler;

impl StandardScaler {
    pub fn new() -> Self {
        Self
    }

    /// Compute per-column mean/std from the training matrix only.
    pub fn fit(&self, train: &Array2<f64>) -> Result<FittedStandardScaler> {
        let (rows, cols) = train.dim();
        if rows == 0 {
            return Err(TabularError::EmptyData(
                "cannot fit scaler on an empty training matrix".to_string(),
            ));
        }

        let mean = train
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(cols));
        let std = train.std_axis(Axis(0), 0.0);
        let std = std.mapv(|s| if s == 0.0 { 1.0 } else { s });

        Ok(FittedStandardScaler {
            mean,
            std,
            n_features: cols,
        })
    }
}

/// Per-column (mean, std) statistics. Immutable after fit.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
    n_features: usize,
}

impl FittedStandardScaler {
    /// Per-column training means.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Per-column training standard deviations, zero replaced by one.
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    /// Number of feature columns seen during fit.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Apply `(x - mean) / std` column-wise to a matrix.
    pub fn apply(&self, matrix: &Array2<f64>) -> Result<Array2<f64>> {
        let (_, cols) = matrix.dim();
        if cols != self.n_features {
            return Err(TabularError::schema_mismatch(format!(
                "matrix has {cols} columns, scaler was fit on {}",
                self.n_features
            )));
        }
        let mut out = matrix.clone();
        for mut row in out.rows_mut() {
            for j in 0..cols {
                row[j] = (row[j] - self.mean[j]) / self.std[j];
            }
        }
        Ok(out)
    }

    /// Apply the fitted statistics to a single feature vector.
    pub fn apply_vec(&self, vector: &Array1<f64>) -> Result<Array1<f64>> {
        if vector.len() != self.n_features {
            return Err(TabularError::schema_mismatch(format!(
                "vector has {} entries, scaler was fit on {}",
                vector.len(),
                self.n_features
            )));
        }
        let mut out = vector.clone();
        for j in 0..self.n_features {
            out[j] = (out[j] - self.mean[j]) / self.std[j];
        }
        Ok(out)
    }
}

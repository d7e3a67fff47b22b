//! Binary logistic regression trained by full-batch gradient descent.
//!
//! The loss is binary cross-entropy with logits; the gradient with respect
//! to the weights is `Xᵀ(σ(z) − y) / n`. Weights start at zero, so training
//! is deterministic for a given matrix.

use crate::error::{Result, TabularError};
use crate::model::{Classifier, Estimator};
use ndarray::{Array1, Array2};
use tracing::debug;

/// Unfitted logistic regression with its training hyperparameters.
#[derive(Clone, Debug)]
pub struct LogisticRegression {
    learning_rate: f64,
    epochs: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 500,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn bce_loss(proba: &Array1<f64>, y: &Array1<f64>) -> f64 {
    let eps = 1e-12;
    let n = y.len() as f64;
    proba
        .iter()
        .zip(y.iter())
        .map(|(&p, &t)| {
            let p = p.clamp(eps, 1.0 - eps);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}

impl Estimator for LogisticRegression {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn fit(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        n_classes: usize,
    ) -> Result<Box<dyn Classifier>> {
        let (rows, cols) = x.dim();
        if rows == 0 {
            return Err(TabularError::EmptyData(
                "cannot fit logistic regression on an empty matrix".to_string(),
            ));
        }
        if y.len() != rows {
            return Err(TabularError::schema_mismatch(format!(
                "label vector has {} entries for {rows} rows",
                y.len()
            )));
        }
        if n_classes != 2 {
            return Err(TabularError::data_quality(
                "target",
                format!("logistic regression supports exactly 2 classes, got {n_classes}"),
            ));
        }

        let n = rows as f64;
        let mut weights = Array1::<f64>::zeros(cols);
        let mut bias = 0.0;

        for epoch in 0..self.epochs {
            let z = x.dot(&weights) + bias;
            let proba = z.mapv(sigmoid);
            let diff = &proba - y;

            let grad_w = x.t().dot(&diff) / n;
            let grad_b = diff.sum() / n;

            weights.scaled_add(-self.learning_rate, &grad_w);
            bias -= self.learning_rate * grad_b;

            if epoch % 100 == 0 {
                debug!(epoch, loss = bce_loss(&proba, y), "logistic regression epoch");
            }
        }

        Ok(Box::new(FittedLogisticRegression { weights, bias }))
    }
}

/// Trained logistic regression: inference parameters only.
#[derive(Clone, Debug)]
pub struct FittedLogisticRegression {
    weights: Array1<f64>,
    bias: f64,
}

impl FittedLogisticRegression {
    /// Learned weights, one per feature column.
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Learned intercept.
    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl Classifier for FittedLogisticRegression {
    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        let proba = (x.dot(&self.weights) + self.bias).mapv(sigmoid);
        proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 })
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Option<Array1<f64>> {
        Some((x.dot(&self.weights) + self.bias).mapv(sigmoid))
    }
}

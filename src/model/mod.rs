//! Classifier contracts and implementations.
//!
//! The pipeline is polymorphic over the concrete algorithm: anything that
//! can be fit into a [`Classifier`] via an [`Estimator`] is interchangeable,
//! and the pipeline never inspects model internals. The unfitted/fitted
//! split mirrors the preprocessing transformers: an [`Estimator`] carries
//! hyperparameters, the [`Classifier`] it produces carries only inference
//! parameters and is never mutated after fit.

pub mod logistic;
pub mod majority;

pub use logistic::{FittedLogisticRegression, LogisticRegression};
pub use majority::{FittedMajorityClass, MajorityClass};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// An untrained classification algorithm plus its hyperparameters.
pub trait Estimator {
    /// Human-readable name used to address reports.
    fn name(&self) -> &'static str;

    /// Train on an encoded, scaled feature matrix and its label vector of
    /// class indices in `0..n_classes`.
    fn fit(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        n_classes: usize,
    ) -> Result<Box<dyn Classifier>>;
}

/// A trained classifier, queried but never mutated after fit.
///
/// `Send + Sync` so a fitted pipeline bundle can serve concurrent
/// predictions without locking.
pub trait Classifier: Send + Sync {
    /// Predicted class index per row.
    fn predict(&self, x: &Array2<f64>) -> Array1<f64>;

    /// Probability of the positive class per row, when the algorithm
    /// produces scores. `None` otherwise (ROC/PR curves then degrade to a
    /// report note).
    fn predict_proba(&self, _x: &Array2<f64>) -> Option<Array1<f64>> {
        None
    }
}

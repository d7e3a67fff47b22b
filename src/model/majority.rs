//! Majority-class baseline classifier.
//!
//! Predicts the most frequent training label for every input. Useful as a
//! sanity floor for accuracy and as a second, score-free implementation of
//! the classifier contract.

use crate::error::{Result, TabularError};
use crate::model::{Classifier, Estimator};
use ndarray::{Array1, Array2};
use std::collections::BTreeMap;

/// Unfitted majority-class baseline.
#[derive(Clone, Debug, Default)]
pub struct MajorityClass;

impl MajorityClass {
    pub fn new() -> Self {
        Self
    }
}

impl Estimator for MajorityClass {
    fn name(&self) -> &'static str {
        "majority_class"
    }

    fn fit(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        _n_classes: usize,
    ) -> Result<Box<dyn Classifier>> {
        if y.is_empty() {
            return Err(TabularError::EmptyData(
                "cannot fit majority baseline on an empty label vector".to_string(),
            ));
        }
        if y.len() != x.nrows() {
            return Err(TabularError::schema_mismatch(format!(
                "label vector has {} entries for {} rows",
                y.len(),
                x.nrows()
            )));
        }

        // BTreeMap so ties resolve to the smallest class index.
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for &label in y.iter() {
            *counts.entry(label.round() as i64).or_insert(0) += 1;
        }
        let label = counts
            .into_iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
            .map(|(k, _)| k as f64)
            .expect("labels are non-empty");

        Ok(Box::new(FittedMajorityClass { label }))
    }
}

/// Trained baseline: just the winning class index.
#[derive(Clone, Debug)]
pub struct FittedMajorityClass {
    label: f64,
}

impl FittedMajorityClass {
    /// The class index predicted for every input.
    pub fn label(&self) -> f64 {
        self.label
    }
}

impl Classifier for FittedMajorityClass {
    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_elem(x.nrows(), self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_predicts_most_frequent_label() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![1.0, 0.0, 1.0, 1.0];

        let model = MajorityClass::new().fit(&x, &y, 2).unwrap();
        let pred = model.predict(&x);
        assert_eq!(pred.to_vec(), vec![1.0; 4]);
    }

    #[test]
    fn test_tie_breaks_to_smaller_class_index() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 0.0];
        let model = MajorityClass::new().fit(&x, &y, 2).unwrap();
        assert_eq!(model.predict(&x).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_handles_multiclass_labels() {
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![2.0, 2.0, 0.0, 1.0, 2.0];
        let model = MajorityClass::new().fit(&x, &y, 3).unwrap();
        assert_eq!(model.predict(&x).to_vec(), vec![2.0; 5]);
    }

    #[test]
    fn test_no_probability_scores() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0, 1.0];
        let model = MajorityClass::new().fit(&x, &y, 2).unwrap();
        assert!(model.predict_proba(&x).is_none());
    }

    #[test]
    fn test_rejects_empty_labels() {
        let x = Array2::<f64>::zeros((0, 1));
        let y = Array1::<f64>::zeros(0);
        assert!(MajorityClass::new().fit(&x, &y, 2).is_err());
    }
}

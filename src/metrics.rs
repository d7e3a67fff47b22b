//! Evaluation metrics: pure functions of predictions, scores, and ground
//! truth.
//!
//! Accuracy and the confusion matrix work for any class count; ROC and
//! precision-recall curves are binary and need both classes present in the
//! held-out labels. [`evaluate`] assembles an [`EvaluationReport`], degrading
//! to notes when a curve cannot be computed (no scores, single observed
//! class) instead of aborting the run.

use crate::error::{Result, TabularError};
use serde::{Deserialize, Serialize};

fn check_lengths(predicted: &[f64], actual: &[f64]) -> Result<()> {
    if predicted.len() != actual.len() {
        return Err(TabularError::schema_mismatch(format!(
            "predicted and actual lengths differ ({} vs {})",
            predicted.len(),
            actual.len()
        )));
    }
    if predicted.is_empty() {
        return Err(TabularError::EmptyData(
            "no predictions to evaluate".to_string(),
        ));
    }
    Ok(())
}

/// Fraction of exact matches, in `[0, 1]`.
pub fn accuracy(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    check_lengths(predicted, actual)?;
    let correct = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p.round() == a.round())
        .count();
    Ok(correct as f64 / predicted.len() as f64)
}

/// `n_classes × n_classes` count grid; rows are actual classes, columns are
/// predicted classes.
pub fn confusion_matrix(
    predicted: &[f64],
    actual: &[f64],
    n_classes: usize,
) -> Result<Vec<Vec<usize>>> {
    check_lengths(predicted, actual)?;
    let mut grid = vec![vec![0usize; n_classes]; n_classes];
    for (p, a) in predicted.iter().zip(actual.iter()) {
        let (p, a) = (p.round() as usize, a.round() as usize);
        if p >= n_classes || a >= n_classes {
            return Err(TabularError::data_quality(
                "target",
                format!("class index out of range: predicted {p}, actual {a}, n_classes {n_classes}"),
            ));
        }
        grid[a][p] += 1;
    }
    Ok(grid)
}

/// Sweep state shared by the ROC and precision-recall curves: cumulative
/// (true positives, false positives) after each distinct score threshold,
/// highest scores first.
fn score_sweep(scores: &[f64], actual: &[f64]) -> Result<(Vec<(usize, usize)>, usize, usize)> {
    check_lengths(scores, actual)?;

    let positives = actual.iter().filter(|&&a| a.round() == 1.0).count();
    let negatives = actual.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(TabularError::data_quality(
            "target",
            "only one class observed in the held-out labels; curves are undefined",
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut points = Vec::new();
    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        // Consume every sample tied at this score before emitting a point.
        while i < order.len() && scores[order[i]] == threshold {
            if actual[order[i]].round() == 1.0 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push((tp, fp));
    }
    Ok((points, positives, negatives))
}

/// ROC curve: `(false positive rate, true positive rate)` points from
/// `(0, 0)` to `(1, 1)`, thresholds descending.
pub fn roc_curve(scores: &[f64], actual: &[f64]) -> Result<Vec<(f64, f64)>> {
    let (sweep, positives, negatives) = score_sweep(scores, actual)?;
    let mut points = vec![(0.0, 0.0)];
    for (tp, fp) in sweep {
        points.push((fp as f64 / negatives as f64, tp as f64 / positives as f64));
    }
    Ok(points)
}

/// Area under a curve of `(x, y)` points via the trapezoid rule.
pub fn auc(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
        .sum()
}

/// Precision-recall curve: `(recall, precision)` points, thresholds
/// descending, starting at `(0, 1)`.
pub fn precision_recall_curve(scores: &[f64], actual: &[f64]) -> Result<Vec<(f64, f64)>> {
    let (sweep, positives, _) = score_sweep(scores, actual)?;
    let mut points = vec![(0.0, 1.0)];
    for (tp, fp) in sweep {
        let recall = tp as f64 / positives as f64;
        let precision = tp as f64 / (tp + fp) as f64;
        points.push((recall, precision));
    }
    Ok(points)
}

/// Everything the evaluator could compute for one classifier on the
/// held-out rows. Curve fields are `None` when they could not be computed;
/// `notes` says why.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Name of the classifier this report addresses.
    pub classifier: String,
    /// Fraction of held-out rows predicted exactly.
    pub accuracy: f64,
    /// Number of held-out rows.
    pub n_test: usize,
    /// Class labels in code order (decoded from the label codebook).
    pub class_labels: Vec<String>,
    /// Confusion grid, rows = actual, columns = predicted.
    pub confusion: Option<Vec<Vec<usize>>>,
    /// ROC points `(fpr, tpr)`.
    pub roc: Option<Vec<(f64, f64)>>,
    /// Area under the ROC curve.
    pub roc_auc: Option<f64>,
    /// Precision-recall points `(recall, precision)`.
    pub precision_recall: Option<Vec<(f64, f64)>>,
    /// Reasons any section above is missing.
    pub notes: Vec<String>,
}

/// Build a report from held-out predictions, optional probability scores,
/// and ground truth. Accuracy is mandatory; every other section degrades to
/// a note on degenerate input.
pub fn evaluate(
    classifier: &str,
    predicted: &[f64],
    actual: &[f64],
    scores: Option<&[f64]>,
    class_labels: &[String],
) -> Result<EvaluationReport> {
    let accuracy = accuracy(predicted, actual)?;
    let mut notes = Vec::new();

    let confusion = match confusion_matrix(predicted, actual, class_labels.len()) {
        Ok(grid) => Some(grid),
        Err(err) => {
            notes.push(format!("confusion matrix unavailable: {err}"));
            None
        }
    };

    let (roc, roc_auc, precision_recall) = match scores {
        None => {
            notes.push(
                "classifier provides no probability scores; ROC and precision-recall omitted"
                    .to_string(),
            );
            (None, None, None)
        }
        Some(scores) => match roc_curve(scores, actual) {
            Ok(roc_points) => {
                let area = auc(&roc_points);
                let pr = precision_recall_curve(scores, actual)?;
                (Some(roc_points), Some(area), Some(pr))
            }
            Err(err) => {
                notes.push(format!("curves unavailable: {err}"));
                (None, None, None)
            }
        },
    };

    Ok(EvaluationReport {
        classifier: classifier.to_string(),
        accuracy,
        n_test: actual.len(),
        class_labels: class_labels.to_vec(),
        confusion,
        roc,
        roc_auc,
        precision_recall,
        notes,
    })
}

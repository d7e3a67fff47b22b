//! Missing-value imputation from training statistics.
//!
//! Numeric columns are filled with the mean of their non-missing training
//! values; categorical columns with the most frequent training value. A
//! column that is missing in every training row has no defined fill value
//! and fails with a `DataQuality` error rather than silently defaulting.

use crate::error::{Result, TabularError};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::schema::{ColumnRole, FeatureSchema};
use crate::table::{RawValue, Record, Table};
use std::collections::BTreeMap;

/// Unfitted imputer. The strategy per column is fixed by its schema role.
#[derive(Clone, Debug, Default)]
pub struct Imputer;

impl Imputer {
    pub fn new() -> Self {
        Self
    }
}

/// Fill values learned from the training partition, one per feature column.
/// Immutable after fit.
#[derive(Clone, Debug)]
pub struct FittedImputer {
    fills: BTreeMap<String, RawValue>,
}

impl Transformer for Imputer {
    type Fitted = FittedImputer;

    fn fit(&self, train: &Table, schema: &FeatureSchema) -> Result<FittedImputer> {
        if train.n_rows() == 0 {
            return Err(TabularError::EmptyData(
                "cannot fit imputer on an empty training partition".to_string(),
            ));
        }

        let mut fills = BTreeMap::new();
        for (column, role) in schema.feature_columns() {
            let values = train.column_values(column)?;
            let present: Vec<&RawValue> = values.iter().filter(|v| !v.is_missing()).copied().collect();
            if present.is_empty() {
                return Err(TabularError::data_quality(
                    column,
                    "missing in every training row, fill value is undefined",
                ));
            }

            let fill = match role {
                ColumnRole::Numeric => {
                    let mut sum = 0.0;
                    for value in &present {
                        sum += value.as_number(column)?;
                    }
                    RawValue::Number(sum / present.len() as f64)
                }
                ColumnRole::Categorical => RawValue::Text(most_frequent(column, &present)?),
                ColumnRole::Target => unreachable!("feature_columns never yields the target"),
            };
            fills.insert(column.to_string(), fill);
        }

        Ok(FittedImputer { fills })
    }
}

/// Most frequent category, ties broken by first occurrence in row order so
/// the result is deterministic.
fn most_frequent(column: &str, present: &[&RawValue]) -> Result<String> {
    let mut counts: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (pos, value) in present.iter().enumerate() {
        let key = value.category_key(column)?;
        let entry = counts.entry(key).or_insert((0, pos));
        entry.0 += 1;
    }
    let best = counts
        .into_iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(key, _)| key)
        .expect("present is non-empty");
    Ok(best)
}

impl FittedImputer {
    /// The fitted fill value for a column, if it is a feature column.
    pub fn fill_value(&self, column: &str) -> Option<&RawValue> {
        self.fills.get(column)
    }
}

impl FittedTransformer for FittedImputer {
    fn apply_table(&self, table: &Table) -> Result<Table> {
        let mut out = table.clone();
        for (column, fill) in &self.fills {
            let Some(col_idx) = table.column_index(column) else {
                return Err(TabularError::schema_mismatch(format!(
                    "table is missing column '{column}' the imputer was fit on"
                )));
            };
            for row in 0..table.n_rows() {
                if table
                    .value(row, column)
                    .is_some_and(|cell| cell.is_missing())
                {
                    out.set(row, col_idx, fill.clone());
                }
            }
        }
        Ok(out)
    }

    fn apply_record(&self, record: &Record) -> Result<Record> {
        let mut out = record.clone();
        for (column, fill) in &self.fills {
            match record.get(column) {
                Some(cell) if cell.is_missing() => {
                    out = out.with(column.clone(), fill.clone());
                }
                Some(_) => {}
                None => {
                    return Err(TabularError::schema_mismatch(format!(
                        "record is missing feature column '{column}'"
                    )));
                }
            }
        }
        Ok(out)
    }
}

//! Categorical encoding through immutable codebooks.
//!
//! Each categorical column gets a [`CategoryCodebook`]: a bijection between
//! the string values observed in the training partition and integer codes
//! assigned in **first-seen order** (row order of the training table, which
//! makes the assignment deterministic). The target column gets its own
//! codebook, which doubles as the label vocabulary.
//!
//! Encoding a value that was never observed during fit is an
//! [`UnknownCategory`](crate::TabularError::UnknownCategory) error, at batch
//! time and at inference time alike. Mapping it to a default code instead
//! would silently corrupt every downstream statistic and prediction.

use crate::error::{Result, TabularError};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::schema::{ColumnRole, FeatureSchema};
use crate::table::{RawValue, Record, Table};
use std::collections::{BTreeMap, HashMap};

/// Immutable value↔code bijection for one categorical column.
#[derive(Clone, Debug)]
pub struct CategoryCodebook {
    column: String,
    values: Vec<String>,
    codes: HashMap<String, usize>,
}

impl CategoryCodebook {
    /// Build a codebook from training-time values, assigning codes in
    /// first-seen order.
    pub fn fit<I>(column: impl Into<String>, observed: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let column = column.into();
        let mut values = Vec::new();
        let mut codes = HashMap::new();
        for value in observed {
            if !codes.contains_key(&value) {
                codes.insert(value.clone(), values.len());
                values.push(value);
            }
        }
        if values.is_empty() {
            return Err(TabularError::EmptyData(format!(
                "no training values to build a codebook for column '{column}'"
            )));
        }
        Ok(Self {
            column,
            values,
            codes,
        })
    }

    /// Column this codebook was fit on.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Code for a training-time value; `UnknownCategory` otherwise.
    pub fn encode(&self, value: &str) -> Result<usize> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| TabularError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    /// Original string for a code produced by [`encode`](Self::encode).
    pub fn decode(&self, code: usize) -> Result<&str> {
        self.values.get(code).map(String::as_str).ok_or_else(|| {
            TabularError::data_quality(
                &self.column,
                format!("code {code} is out of range (codebook has {})", self.values.len()),
            )
        })
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the codebook holds no values (cannot happen after `fit`).
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in code order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Unfitted categorical encoder.
#[derive(Clone, Debug, Default)]
pub struct CategoryEncoder;

impl CategoryEncoder {
    pub fn new() -> Self {
        Self
    }
}

/// Fitted encoder: one codebook per categorical feature column, plus the
/// label codebook for the target column. Immutable after fit.
#[derive(Clone, Debug)]
pub struct FittedCategoryEncoder {
    codebooks: BTreeMap<String, CategoryCodebook>,
    labels: CategoryCodebook,
}

impl Transformer for CategoryEncoder {
    type Fitted = FittedCategoryEncoder;

    fn fit(&self, train: &Table, schema: &FeatureSchema) -> Result<FittedCategoryEncoder> {
        if train.n_rows() == 0 {
            return Err(TabularError::EmptyData(
                "cannot fit category encoder on an empty training partition".to_string(),
            ));
        }

        let mut codebooks = BTreeMap::new();
        for (column, role) in schema.feature_columns() {
            if role != ColumnRole::Categorical {
                continue;
            }
            let keys = column_keys(train, column)?;
            codebooks.insert(column.to_string(), CategoryCodebook::fit(column, keys)?);
        }

        let target = schema.target();
        let labels = CategoryCodebook::fit(target, column_keys(train, target)?)?;

        Ok(FittedCategoryEncoder { codebooks, labels })
    }
}

fn column_keys(table: &Table, column: &str) -> Result<Vec<String>> {
    table
        .column_values(column)?
        .into_iter()
        .map(|value| value.category_key(column))
        .collect()
}

impl FittedCategoryEncoder {
    /// Codebook for a categorical feature column, if one was fit.
    pub fn codebook(&self, column: &str) -> Option<&CategoryCodebook> {
        self.codebooks.get(column)
    }

    /// The label vocabulary discovered on the target column.
    pub fn labels(&self) -> &CategoryCodebook {
        &self.labels
    }

    fn encode_cell(&self, codebook: &CategoryCodebook, cell: &RawValue) -> Result<RawValue> {
        let key = cell.category_key(codebook.column())?;
        Ok(RawValue::Number(codebook.encode(&key)? as f64))
    }
}

impl FittedTransformer for FittedCategoryEncoder {
    /// Replace categorical cells with their codes. If the table carries the
    /// target column, labels are encoded too.
    fn apply_table(&self, table: &Table) -> Result<Table> {
        let mut out = table.clone();
        for (column, codebook) in self
            .codebooks
            .iter()
            .map(|(name, cb)| (name.as_str(), cb))
            .chain(std::iter::once((self.labels.column(), &self.labels)))
        {
            let Some(col_idx) = table.column_index(column) else {
                if column == self.labels.column() {
                    // Inference tables have no target column.
                    continue;
                }
                return Err(TabularError::schema_mismatch(format!(
                    "table is missing column '{column}' the encoder was fit on"
                )));
            };
            for (row, cells) in table.rows().enumerate() {
                out.set(row, col_idx, self.encode_cell(codebook, &cells[col_idx])?);
            }
        }
        Ok(out)
    }

    fn apply_record(&self, record: &Record) -> Result<Record> {
        let mut out = record.clone();
        for (column, codebook) in &self.codebooks {
            let Some(cell) = record.get(column) else {
                return Err(TabularError::schema_mismatch(format!(
                    "record is missing categorical column '{column}'"
                )));
            };
            out = out.with(column.clone(), self.encode_cell(codebook, cell)?);
        }
        Ok(out)
    }
}

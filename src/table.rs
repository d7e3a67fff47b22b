//! In-memory tabular data: raw cell values, tables, and single records.
//!
//! A [`Table`] is an ordered sequence of rows over a fixed column set; cells
//! are [`RawValue`]s (number, string, or missing). A [`Record`] is the
//! single-row input scored at inference time.
//!
//! CSV loading parses cells according to the [`FeatureSchema`]: numeric
//! columns must parse as floats (empty cells become [`RawValue::Missing`],
//! anything else is a `DataQuality` error), categorical and target columns
//! are kept as text.

use crate::error::{Result, TabularError};
use crate::schema::{ColumnRole, FeatureSchema};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

/// One raw cell of a dataset or record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// A parsed numeric value.
    Number(f64),
    /// A string value (categorical levels, class labels).
    Text(String),
    /// An absent value, to be filled by the imputer.
    Missing,
}

impl RawValue {
    /// Convenience constructor for text cells.
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    /// Whether this cell is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    /// Interpret the cell as a number. Text is parsed; missing or
    /// unparseable cells are `DataQuality` errors naming `column`.
    pub fn as_number(&self, column: &str) -> Result<f64> {
        match self {
            RawValue::Number(v) => Ok(*v),
            RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                TabularError::data_quality(column, format!("expected a number, got '{s}'"))
            }),
            RawValue::Missing => Err(TabularError::data_quality(
                column,
                "missing value where a number was required",
            )),
        }
    }

    /// Canonical string key for codebook lookups. Numbers are formatted
    /// without a trailing `.0` so that `Number(1.0)` and `Text("1")` agree.
    pub fn category_key(&self, column: &str) -> Result<String> {
        match self {
            RawValue::Text(s) => Ok(s.clone()),
            RawValue::Number(v) => {
                if v.fract() == 0.0 && v.is_finite() {
                    Ok(format!("{}", *v as i64))
                } else {
                    Ok(format!("{v}"))
                }
            }
            RawValue::Missing => Err(TabularError::data_quality(
                column,
                "missing value where a category was required",
            )),
        }
    }
}

/// Ordered dataset: a fixed column set and one `Vec<RawValue>` per row.
#[derive(Clone, Debug)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<RawValue>>,
}

impl Table {
    /// Build a table, checking that every row matches the column count and
    /// that column names are unique.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<RawValue>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(TabularError::schema_mismatch(format!(
                    "duplicate column '{name}' in table"
                )));
            }
        }
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TabularError::schema_mismatch(format!(
                    "row {row_idx} has {} cells, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Load a CSV file with a header row, typing cells per `schema`.
    pub fn from_csv_path(path: impl AsRef<Path>, schema: &FeatureSchema) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, schema)
    }

    /// Load CSV data from any reader, typing cells per `schema`.
    pub fn from_csv_reader<R: Read>(reader: R, schema: &FeatureSchema) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let roles: Vec<ColumnRole> = headers
            .iter()
            .map(|name| {
                schema.role(name).ok_or_else(|| {
                    TabularError::schema_mismatch(format!(
                        "csv column '{name}' is not declared in the schema"
                    ))
                })
            })
            .collect::<Result<_>>()?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row = Vec::with_capacity(headers.len());
            for (i, field) in record.iter().enumerate() {
                let cell = parse_cell(field, &headers[i], roles[i])?;
                row.push(cell);
            }
            rows.push(row);
        }

        let table = Self::new(headers, rows)?;
        schema.validate_table(&table)?;
        Ok(table)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Column names in table order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Index of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Cell at `(row, column)`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&RawValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&RawValue>> {
        let col = self.column_index(name).ok_or_else(|| {
            TabularError::schema_mismatch(format!("no column '{name}' in table"))
        })?;
        Ok(self.rows.iter().map(|row| &row[col]).collect())
    }

    /// Rows as cell slices, in order.
    pub fn rows(&self) -> impl Iterator<Item = &[RawValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// New table containing the given rows, in the order of `indices`.
    pub fn subset(&self, indices: &[usize]) -> Table {
        let rows = indices.iter().map(|&i| self.rows[i].clone()).collect();
        Table {
            columns: self.columns.clone(),
            index: self.index.clone(),
            rows,
        }
    }

    /// Replace the cell at `(row, col_idx)`. Internal: used by fitted
    /// transformers when producing a transformed copy.
    pub(crate) fn set(&mut self, row: usize, col_idx: usize, value: RawValue) {
        self.rows[row][col_idx] = value;
    }
}

fn parse_cell(field: &str, column: &str, role: ColumnRole) -> Result<RawValue> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(RawValue::Missing);
    }
    match role {
        ColumnRole::Numeric => trimmed.parse::<f64>().map(RawValue::Number).map_err(|_| {
            TabularError::data_quality(column, format!("expected a number, got '{trimmed}'"))
        }),
        ColumnRole::Categorical | ColumnRole::Target => Ok(RawValue::text(trimmed)),
    }
}

/// A single raw record for inference: feature column name → raw value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    values: BTreeMap<String, RawValue>,
}

impl Record {
    /// Empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field, builder style.
    pub fn with(mut self, column: impl Into<String>, value: RawValue) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    /// Look up a field.
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.values.get(column)
    }

    /// Column names present in this record.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn schema() -> FeatureSchema {
        FeatureSchema::from_pairs(&[
            ("age", ColumnRole::Numeric),
            ("sex", ColumnRole::Categorical),
            ("survived", ColumnRole::Target),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_rejects_ragged_rows() {
        let result = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![RawValue::Number(1.0)]],
        );
        assert!(matches!(result, Err(TabularError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_csv_parses_per_role() {
        let csv = "age,sex,survived\n22,male,0\n,female,1\n38.5,female,1\n";
        let table = Table::from_csv_reader(csv.as_bytes(), &schema()).unwrap();

        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.value(0, "age"), Some(&RawValue::Number(22.0)));
        assert_eq!(table.value(1, "age"), Some(&RawValue::Missing));
        assert_eq!(table.value(2, "age"), Some(&RawValue::Number(38.5)));
        assert_eq!(table.value(0, "sex"), Some(&RawValue::text("male")));
        // Target stays text; the label codebook decides its vocabulary.
        assert_eq!(table.value(0, "survived"), Some(&RawValue::text("0")));
    }

    #[test]
    fn test_csv_bad_number_is_data_quality() {
        let csv = "age,sex,survived\ntwenty,male,0\n";
        let result = Table::from_csv_reader(csv.as_bytes(), &schema());
        assert!(matches!(result, Err(TabularError::DataQuality { .. })));
    }

    #[test]
    fn test_csv_undeclared_column_is_schema_mismatch() {
        let csv = "age,sex,cabin,survived\n22,male,C85,0\n";
        let result = Table::from_csv_reader(csv.as_bytes(), &schema());
        assert!(matches!(result, Err(TabularError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_csv_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "age,sex,survived\n22,male,0\n30,female,1\n").unwrap();

        let table = Table::from_csv_path(file.path(), &schema()).unwrap();
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_subset_preserves_order() {
        let csv = "age,sex,survived\n1,male,0\n2,female,1\n3,male,0\n";
        let table = Table::from_csv_reader(csv.as_bytes(), &schema()).unwrap();

        let sub = table.subset(&[2, 0]);
        assert_eq!(sub.n_rows(), 2);
        assert_eq!(sub.value(0, "age"), Some(&RawValue::Number(3.0)));
        assert_eq!(sub.value(1, "age"), Some(&RawValue::Number(1.0)));
    }

    #[test]
    fn test_category_key_canonicalizes_numbers() {
        assert_eq!(
            RawValue::Number(1.0).category_key("pclass").unwrap(),
            "1".to_string()
        );
        assert_eq!(
            RawValue::text("1").category_key("pclass").unwrap(),
            "1".to_string()
        );
        assert!(RawValue::Missing.category_key("pclass").is_err());
    }

    #[test]
    fn test_as_number_parses_text() {
        assert_eq!(RawValue::text(" 3.5 ").as_number("fare").unwrap(), 3.5);
        assert!(RawValue::text("abc").as_number("fare").is_err());
        assert!(RawValue::Missing.as_number("fare").is_err());
    }
}

//! Feature schema: per-column roles and validation.
//!
//! The schema fixes the column order of the feature matrix: non-target
//! columns appear in declaration order, and every downstream consumer
//! (imputer, encoder, scaler, model, inference gateway) assembles vectors in
//! that order.

use crate::error::{Result, TabularError};
use crate::table::{Record, Table};
use serde::{Deserialize, Serialize};

/// Role of a column in the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Real-valued feature; imputed with the training mean, then scaled.
    Numeric,
    /// String-valued feature; imputed with the most frequent training value,
    /// then mapped through a codebook.
    Categorical,
    /// The label column. Exactly one per schema.
    Target,
}

/// Declares, per column, its role in the workflow.
///
/// Invariants, enforced at construction: column names are unique, and exactly
/// one column is the target.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<(String, ColumnRole)>,
}

impl FeatureSchema {
    /// Build a schema from `(name, role)` pairs in feature-matrix order.
    pub fn new(columns: Vec<(String, ColumnRole)>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for (name, _) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(TabularError::schema_mismatch(format!(
                    "duplicate column '{name}' in schema"
                )));
            }
        }

        let targets = columns
            .iter()
            .filter(|(_, role)| *role == ColumnRole::Target)
            .count();
        if targets != 1 {
            return Err(TabularError::schema_mismatch(format!(
                "schema must have exactly one target column, found {targets}"
            )));
        }

        Ok(Self { columns })
    }

    /// Convenience constructor from `&str` names.
    pub fn from_pairs(pairs: &[(&str, ColumnRole)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|(name, role)| (name.to_string(), *role))
                .collect(),
        )
    }

    /// Name of the target column.
    pub fn target(&self) -> &str {
        self.columns
            .iter()
            .find(|(_, role)| *role == ColumnRole::Target)
            .map(|(name, _)| name.as_str())
            .expect("schema invariant: exactly one target")
    }

    /// Non-target columns in declaration order. This order defines the
    /// feature-matrix layout.
    pub fn feature_columns(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.columns
            .iter()
            .filter(|(_, role)| *role != ColumnRole::Target)
            .map(|(name, role)| (name.as_str(), *role))
    }

    /// Number of feature (non-target) columns.
    pub fn n_features(&self) -> usize {
        self.columns
            .iter()
            .filter(|(_, role)| *role != ColumnRole::Target)
            .count()
    }

    /// All columns, target included, in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.columns
            .iter()
            .map(|(name, role)| (name.as_str(), *role))
    }

    /// Role of a column, if it is declared.
    pub fn role(&self, name: &str) -> Option<ColumnRole> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, role)| *role)
    }

    /// Check that `table` carries exactly the schema's column set.
    pub fn validate_table(&self, table: &Table) -> Result<()> {
        for (name, _) in &self.columns {
            if table.column_index(name).is_none() {
                return Err(TabularError::schema_mismatch(format!(
                    "table is missing column '{name}'"
                )));
            }
        }
        for name in table.columns() {
            if self.role(name).is_none() {
                return Err(TabularError::schema_mismatch(format!(
                    "table column '{name}' is not declared in the schema"
                )));
            }
        }
        Ok(())
    }

    /// Check that `record` covers exactly the non-target columns.
    pub fn validate_record(&self, record: &Record) -> Result<()> {
        for (name, _) in self.feature_columns() {
            if record.get(name).is_none() {
                return Err(TabularError::schema_mismatch(format!(
                    "record is missing feature column '{name}'"
                )));
            }
        }
        for name in record.columns() {
            match self.role(name) {
                None => {
                    return Err(TabularError::schema_mismatch(format!(
                        "record column '{name}' is not declared in the schema"
                    )));
                }
                Some(ColumnRole::Target) => {
                    return Err(TabularError::schema_mismatch(format!(
                        "record must not contain the target column '{name}'"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RawValue;

    fn titanic_schema() -> FeatureSchema {
        FeatureSchema::from_pairs(&[
            ("age", ColumnRole::Numeric),
            ("sex", ColumnRole::Categorical),
            ("survived", ColumnRole::Target),
        ])
        .unwrap()
    }

    #[test]
    fn test_schema_requires_one_target() {
        let no_target = FeatureSchema::from_pairs(&[("a", ColumnRole::Numeric)]);
        assert!(no_target.is_err());

        let two_targets = FeatureSchema::from_pairs(&[
            ("a", ColumnRole::Target),
            ("b", ColumnRole::Target),
        ]);
        assert!(two_targets.is_err());
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let dup = FeatureSchema::from_pairs(&[
            ("a", ColumnRole::Numeric),
            ("a", ColumnRole::Categorical),
            ("y", ColumnRole::Target),
        ]);
        assert!(dup.is_err());
    }

    #[test]
    fn test_feature_order_is_declaration_order() {
        let schema = titanic_schema();
        let names: Vec<&str> = schema.feature_columns().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["age", "sex"]);
        assert_eq!(schema.target(), "survived");
        assert_eq!(schema.n_features(), 2);
    }

    #[test]
    fn test_validate_record_exact_column_set() {
        let schema = titanic_schema();

        let ok = Record::new()
            .with("age", RawValue::Number(30.0))
            .with("sex", RawValue::text("male"));
        assert!(schema.validate_record(&ok).is_ok());

        let missing = Record::new().with("age", RawValue::Number(30.0));
        assert!(matches!(
            schema.validate_record(&missing),
            Err(TabularError::SchemaMismatch { .. })
        ));

        let extra = ok.clone().with("cabin", RawValue::text("C85"));
        assert!(matches!(
            schema.validate_record(&extra),
            Err(TabularError::SchemaMismatch { .. })
        ));

        let with_target = ok.with("survived", RawValue::Number(1.0));
        assert!(matches!(
            schema.validate_record(&with_target),
            Err(TabularError::SchemaMismatch { .. })
        ));
    }
}

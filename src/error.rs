//! Error types for the tabular workflow.
//!
//! Every failure a caller can recover from is represented here, with enough
//! context (column name, offending value) to diagnose the input that caused
//! it. Nothing in the preprocessing or inference path catches and swallows
//! these; evaluation-time degeneracies are the one exception and degrade to a
//! partial report instead (see [`crate::metrics`]).

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TabularError>;

/// Error type for dataset loading, preprocessing, training, and inference.
#[derive(Debug, Error)]
pub enum TabularError {
    /// A column cannot support the statistic or transform asked of it,
    /// e.g. it is missing in every training row or holds an unparseable cell.
    #[error("data quality problem in column '{column}': {reason}")]
    DataQuality { column: String, reason: String },

    /// A categorical value was never observed during fit. Encoding it to a
    /// default code would silently corrupt predictions, so it is an error.
    #[error("unknown category '{value}' in column '{column}': not seen during fit")]
    UnknownCategory { column: String, value: String },

    /// A table or record's column set disagrees with the feature schema.
    #[error("schema mismatch: {reason}")]
    SchemaMismatch { reason: String },

    /// A prediction or report was requested before training completed.
    #[error("model is not fit yet: call train() before predicting or reporting")]
    ModelNotFit,

    /// Empty input where at least one row was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Invalid configuration value (e.g. a test fraction outside (0, 1)).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// CSV parsing failure while loading a dataset.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failure while reading or writing a report.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure while loading a dataset.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TabularError {
    /// Shorthand for a [`TabularError::DataQuality`] error.
    pub fn data_quality(column: impl Into<String>, reason: impl Into<String>) -> Self {
        TabularError::DataQuality {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`TabularError::SchemaMismatch`] error.
    pub fn schema_mismatch(reason: impl Into<String>) -> Self {
        TabularError::SchemaMismatch {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_quality_display() {
        let err = TabularError::data_quality("age", "missing in every training row");
        let msg = err.to_string();
        assert!(msg.contains("age"));
        assert!(msg.contains("missing in every training row"));
    }

    #[test]
    fn test_unknown_category_display() {
        let err = TabularError::UnknownCategory {
            column: "port".to_string(),
            value: "unknown_port".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("port"));
        assert!(msg.contains("unknown_port"));
    }

    #[test]
    fn test_model_not_fit_display() {
        let err = TabularError::ModelNotFit;
        assert!(err.to_string().contains("not fit"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TabularError = io_err.into();
        assert!(matches!(err, TabularError::Io(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = TabularError::ModelNotFit;
        let _: &dyn std::error::Error = &err;
    }
}

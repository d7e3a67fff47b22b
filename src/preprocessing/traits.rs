//! Core traits for table-level preprocessing transformers.
//!
//! [`Transformer`] is the unfitted state: it learns statistics from the
//! training partition. [`FittedTransformer`] is the fitted state: immutable,
//! applied without ever modifying its statistics, to both whole tables and
//! single inference records. Fit functions take the training table only;
//! there is deliberately no way to hand them the full dataset and the split
//! at once.

use crate::error::Result;
use crate::schema::FeatureSchema;
use crate::table::{Record, Table};

/// An unfitted transformer that learns from training rows.
pub trait Transformer {
    /// The fitted transformer type produced by [`fit`](Transformer::fit).
    type Fitted: FittedTransformer;

    /// Compute statistics from the training partition only.
    fn fit(&self, train: &Table, schema: &FeatureSchema) -> Result<Self::Fitted>;
}

/// A fitted transformer, ready to be applied at train and inference time.
///
/// Both methods are pure with respect to the fitted state: applying a
/// transformer never updates its statistics.
pub trait FittedTransformer {
    /// Transform every row of a table, returning a new table.
    fn apply_table(&self, table: &Table) -> Result<Table>;

    /// Transform a single raw record the same way training rows were
    /// transformed.
    fn apply_record(&self, record: &Record) -> Result<Record>;
}

//! Supervised tabular classification with train/inference-consistent
//! preprocessing.
//!
//! The crate is built around one guarantee: every statistic used to prepare
//! the training matrix (imputation fills, category codebooks, scaling stats)
//! is computed from the training partition only, frozen at fit time, and
//! applied identically to held-out rows and to single records scored later.
//! A value the pipeline has never seen is a hard
//! [`UnknownCategory`](TabularError::UnknownCategory) error, never a silent
//! default.
//!
//! Modules, bottom up:
//!
//! - [`error`]: the crate-wide error taxonomy.
//! - [`schema`]: column names and roles (numeric, categorical, target).
//! - [`table`]: in-memory tables, raw cell values, CSV loading, records.
//! - [`split`]: seeded, leak-free train/test row splitting.
//! - [`preprocessing`]: unfitted/fitted imputer, encoder, and scaler pairs.
//! - [`model`]: the [`Estimator`]/[`Classifier`] contracts and the
//!   logistic-regression and majority-class implementations.
//! - [`metrics`]: accuracy, confusion matrix, ROC and precision-recall
//!   curves, and the [`EvaluationReport`].
//! - [`pipeline`]: the fit flow and the immutable [`FittedPipeline`]
//!   bundle that scores new records.
//! - [`workflow`]: a stateful load/train/query wrapper over one dataset.
//!
//! ```no_run
//! use tablearn::{
//!     ClassifierKind, ColumnRole, FeatureSchema, PipelineConfig, RawValue, Record, Table,
//!     Workflow,
//! };
//!
//! # fn main() -> tablearn::Result<()> {
//! let schema = FeatureSchema::from_pairs(&[
//!     ("age", ColumnRole::Numeric),
//!     ("sex", ColumnRole::Categorical),
//!     ("survived", ColumnRole::Target),
//! ])?;
//! let table = Table::from_csv_path("titanic.csv", &schema)?;
//!
//! let mut workflow = Workflow::new(table, schema, PipelineConfig::default())?;
//! let report = workflow.train(ClassifierKind::Logistic)?;
//! println!("held-out accuracy: {:.3}", report.accuracy);
//!
//! let label = workflow.predict_record(
//!     &Record::new()
//!         .with("age", RawValue::Number(29.0))
//!         .with("sex", RawValue::text("female")),
//! )?;
//! println!("predicted: {label}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod preprocessing;
pub mod schema;
pub mod split;
pub mod table;
pub mod workflow;

pub use error::{Result, TabularError};
pub use metrics::EvaluationReport;
pub use model::{Classifier, Estimator, LogisticRegression, MajorityClass};
pub use pipeline::{FittedPipeline, PipelineConfig};
pub use preprocessing::{
    CategoryCodebook, CategoryEncoder, FittedCategoryEncoder, FittedImputer,
    FittedStandardScaler, Imputer, StandardScaler,
};
pub use schema::{ColumnRole, FeatureSchema};
pub use split::train_test_split;
pub use table::{RawValue, Record, Table};
pub use workflow::{ClassifierKind, Workflow};

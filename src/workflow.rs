//! Stateful wrapper around one dataset: load once, train (and retrain) a
//! chosen classifier, then query the report or score records.
//!
//! The workflow enforces ordering at runtime: querying before a successful
//! `train` is a `ModelNotFit` error, and retraining replaces the fitted
//! bundle atomically, so readers never observe a half-trained state.

use crate::error::{Result, TabularError};
use crate::metrics::EvaluationReport;
use crate::model::{Estimator, LogisticRegression, MajorityClass};
use crate::pipeline::{FittedPipeline, PipelineConfig};
use crate::schema::FeatureSchema;
use crate::table::{Record, Table};
use serde::{Deserialize, Serialize};

/// Which classification algorithm to train.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Binary logistic regression trained by gradient descent.
    Logistic,
    /// Always predicts the most frequent training class. Useful as the
    /// floor any real model has to beat.
    Majority,
}

impl ClassifierKind {
    /// Build the estimator for this kind with hyperparameters from `config`.
    pub fn estimator(&self, config: &PipelineConfig) -> Box<dyn Estimator> {
        match self {
            ClassifierKind::Logistic => Box::new(
                LogisticRegression::new()
                    .with_learning_rate(config.learning_rate)
                    .with_epochs(config.epochs),
            ),
            ClassifierKind::Majority => Box::new(MajorityClass::new()),
        }
    }
}

/// One dataset plus, after [`train`](Workflow::train), a fitted pipeline
/// and its held-out evaluation.
pub struct Workflow {
    table: Table,
    schema: FeatureSchema,
    config: PipelineConfig,
    fitted: Option<(FittedPipeline, EvaluationReport)>,
}

impl Workflow {
    /// Wrap a dataset, validating it against the schema up front so a bad
    /// table fails here rather than mid-train.
    pub fn new(table: Table, schema: FeatureSchema, config: PipelineConfig) -> Result<Self> {
        schema.validate_table(&table)?;
        Ok(Self {
            table,
            schema,
            config,
            fitted: None,
        })
    }

    /// Train `kind` on the dataset, replacing any previously fitted
    /// pipeline. On error the previous fitted state is kept untouched.
    pub fn train(&mut self, kind: ClassifierKind) -> Result<&EvaluationReport> {
        let estimator = kind.estimator(&self.config);
        let fitted =
            FittedPipeline::fit(&self.table, &self.schema, estimator.as_ref(), &self.config)?;
        self.fitted = Some(fitted);
        self.report()
    }

    /// Evaluation of the most recent training run.
    pub fn report(&self) -> Result<&EvaluationReport> {
        self.fitted
            .as_ref()
            .map(|(_, report)| report)
            .ok_or(TabularError::ModelNotFit)
    }

    /// The fitted bundle of the most recent training run.
    pub fn pipeline(&self) -> Result<&FittedPipeline> {
        self.fitted
            .as_ref()
            .map(|(pipeline, _)| pipeline)
            .ok_or(TabularError::ModelNotFit)
    }

    /// Score one raw record through the fitted pipeline.
    pub fn predict_record(&self, record: &Record) -> Result<String> {
        self.pipeline()?.predict_record(record)
    }

    /// The dataset this workflow wraps.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The schema this workflow validates against.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnRole;
    use crate::table::RawValue;

    fn schema() -> FeatureSchema {
        FeatureSchema::from_pairs(&[
            ("age", ColumnRole::Numeric),
            ("sex", ColumnRole::Categorical),
            ("survived", ColumnRole::Target),
        ])
        .unwrap()
    }

    fn table() -> Table {
        let rows = vec![
            (22.0, "male", "0"),
            (35.0, "male", "0"),
            (45.0, "male", "0"),
            (28.0, "male", "0"),
            (60.0, "male", "0"),
            (24.0, "female", "1"),
            (19.0, "female", "1"),
            (31.0, "female", "1"),
            (27.0, "female", "1"),
            (40.0, "female", "1"),
        ];
        Table::new(
            vec!["age".into(), "sex".into(), "survived".into()],
            rows.into_iter()
                .map(|(age, sex, y)| {
                    vec![RawValue::Number(age), RawValue::text(sex), RawValue::text(y)]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_query_before_train_is_model_not_fit() {
        let wf = Workflow::new(table(), schema(), PipelineConfig::default()).unwrap();

        assert!(matches!(wf.report(), Err(TabularError::ModelNotFit)));
        assert!(matches!(wf.pipeline(), Err(TabularError::ModelNotFit)));

        let record = Record::new()
            .with("age", RawValue::Number(30.0))
            .with("sex", RawValue::text("male"));
        assert!(matches!(
            wf.predict_record(&record),
            Err(TabularError::ModelNotFit)
        ));
    }

    #[test]
    fn test_train_then_query() {
        let mut wf = Workflow::new(table(), schema(), PipelineConfig::default()).unwrap();
        let report = wf.train(ClassifierKind::Logistic).unwrap();
        assert_eq!(report.classifier, "logistic_regression");

        let record = Record::new()
            .with("age", RawValue::Number(25.0))
            .with("sex", RawValue::text("female"));
        let label = wf.predict_record(&record).unwrap();
        assert!(label == "0" || label == "1");
    }

    #[test]
    fn test_retrain_replaces_the_fitted_pipeline() {
        let mut wf = Workflow::new(table(), schema(), PipelineConfig::default()).unwrap();
        wf.train(ClassifierKind::Logistic).unwrap();
        assert_eq!(wf.report().unwrap().classifier, "logistic_regression");

        wf.train(ClassifierKind::Majority).unwrap();
        assert_eq!(wf.report().unwrap().classifier, "majority_class");
        assert_eq!(wf.pipeline().unwrap().classifier_name(), "majority_class");
    }

    #[test]
    fn test_bad_table_fails_at_construction() {
        let incomplete = Table::new(
            vec!["age".into(), "survived".into()],
            vec![vec![RawValue::Number(1.0), RawValue::text("0")]],
        )
        .unwrap();
        assert!(matches!(
            Workflow::new(incomplete, schema(), PipelineConfig::default()),
            Err(TabularError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_classifier_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&ClassifierKind::Logistic).unwrap(),
            "\"logistic\""
        );
        let kind: ClassifierKind = serde_json::from_str("\"majority\"").unwrap();
        assert_eq!(kind, ClassifierKind::Majority);
    }
}

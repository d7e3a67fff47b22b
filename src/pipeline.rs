//! The fitted pipeline bundle and the train/inference flow around it.
//!
//! [`FittedPipeline::fit`] runs the whole training flow: validate against the
//! schema, split first, then fit imputer, codebooks, scaler, and model on the
//! training partition only, and evaluate on the held-out rows. The returned
//! bundle holds every fitted statistic (impute fills, codebooks, scale
//! stats, trained model), since scoring a new record needs all of them.
//!
//! The bundle is immutable after fit. Scoring never refits anything, so any
//! number of callers may predict from a shared bundle concurrently.

use crate::error::{Result, TabularError};
use crate::metrics::{self, EvaluationReport};
use crate::model::{Classifier, Estimator};
use crate::preprocessing::{
    CategoryCodebook, CategoryEncoder, FittedCategoryEncoder, FittedImputer,
    FittedStandardScaler, FittedTransformer, Imputer, StandardScaler, Transformer,
};
use crate::schema::FeatureSchema;
use crate::split::train_test_split;
use crate::table::{Record, Table};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Knobs for one training run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fraction of rows held out for evaluation, in (0, 1).
    pub test_fraction: f64,
    /// Seed for the split shuffle; same seed, same partition.
    pub seed: u64,
    /// Learning rate for gradient-trained estimators.
    pub learning_rate: f64,
    /// Epoch count for gradient-trained estimators.
    pub epochs: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            learning_rate: 0.1,
            epochs: 500,
        }
    }
}

/// The immutable fitted bundle: schema plus every statistic needed to score
/// a new record exactly as training rows were scored.
pub struct FittedPipeline {
    schema: FeatureSchema,
    imputer: FittedImputer,
    encoder: FittedCategoryEncoder,
    scaler: FittedStandardScaler,
    model: Box<dyn Classifier>,
    classifier_name: String,
}

impl FittedPipeline {
    /// Train the full pipeline on `table` and evaluate on the held-out
    /// partition.
    ///
    /// The split happens before any statistic is computed; every `fit` call
    /// below receives the training partition only, so held-out rows can
    /// never leak into training statistics.
    pub fn fit(
        table: &Table,
        schema: &FeatureSchema,
        estimator: &dyn Estimator,
        config: &PipelineConfig,
    ) -> Result<(FittedPipeline, EvaluationReport)> {
        schema.validate_table(table)?;

        let (train_idx, test_idx) =
            train_test_split(table.n_rows(), config.test_fraction, config.seed)?;
        info!(
            train_rows = train_idx.len(),
            test_rows = test_idx.len(),
            seed = config.seed,
            "split dataset"
        );
        let train = table.subset(&train_idx);
        let test = table.subset(&test_idx);

        let imputer = Imputer::new().fit(&train, schema)?;
        let train = imputer.apply_table(&train)?;
        let test = imputer.apply_table(&test)?;

        let encoder = CategoryEncoder::new().fit(&train, schema)?;
        let train = encoder.apply_table(&train)?;
        // A test row may hold a category never seen in training; that
        // surfaces here as UnknownCategory rather than a silent code.
        let test = encoder.apply_table(&test)?;

        let (x_train, y_train) = assemble(&train, schema)?;
        let (x_test, y_test) = assemble(&test, schema)?;

        let scaler = StandardScaler::new().fit(&x_train)?;
        let x_train = scaler.apply(&x_train)?;
        let x_test = scaler.apply(&x_test)?;

        let n_classes = encoder.labels().len();
        info!(
            classifier = estimator.name(),
            n_features = schema.n_features(),
            n_classes,
            "fitting classifier"
        );
        let model = estimator.fit(&x_train, &y_train, n_classes)?;

        let predicted = model.predict(&x_test).to_vec();
        let scores = model.predict_proba(&x_test).map(|s| s.to_vec());
        let actual = y_test.to_vec();
        let class_labels = encoder.labels().values().to_vec();
        let report = metrics::evaluate(
            estimator.name(),
            &predicted,
            &actual,
            scores.as_deref(),
            &class_labels,
        )?;
        info!(accuracy = report.accuracy, "evaluated on held-out rows");

        let pipeline = FittedPipeline {
            schema: schema.clone(),
            imputer,
            encoder,
            scaler,
            model,
            classifier_name: estimator.name().to_string(),
        };
        Ok((pipeline, report))
    }

    /// Name of the classifier in the bundle.
    pub fn classifier_name(&self) -> &str {
        &self.classifier_name
    }

    /// The label vocabulary discovered on the target column during fit.
    pub fn labels(&self) -> &CategoryCodebook {
        self.encoder.labels()
    }

    /// The schema the pipeline was fit with.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Score one raw record using the fitted statistics, never refitting.
    ///
    /// Missing fields are imputed from training statistics, categorical
    /// fields go through the training-time codebooks (`UnknownCategory` for
    /// unseen values), the vector is scaled with training-time stats, and
    /// the model's class index is decoded back to its label.
    pub fn predict_record(&self, record: &Record) -> Result<String> {
        self.schema.validate_record(record)?;

        let record = self.imputer.apply_record(record)?;
        let record = self.encoder.apply_record(&record)?;

        let mut features = Vec::with_capacity(self.schema.n_features());
        for (column, _) in self.schema.feature_columns() {
            let cell = record.get(column).ok_or_else(|| {
                TabularError::schema_mismatch(format!("record is missing column '{column}'"))
            })?;
            features.push(cell.as_number(column)?);
        }

        let vector = self.scaler.apply_vec(&Array1::from(features))?;
        let matrix = vector.insert_axis(Axis(0));
        let code = self.model.predict(&matrix)[0].round();
        if code < 0.0 {
            return Err(TabularError::data_quality(
                self.schema.target(),
                format!("classifier produced a negative class index {code}"),
            ));
        }
        Ok(self.labels().decode(code as usize)?.to_string())
    }

    /// Score every row of a feature table (target column not required),
    /// applying exactly the record path per row.
    pub fn predict_table(&self, table: &Table) -> Result<Vec<String>> {
        let columns: Vec<String> = self
            .schema
            .feature_columns()
            .map(|(name, _)| name.to_string())
            .collect();
        let mut out = Vec::with_capacity(table.n_rows());
        for row in 0..table.n_rows() {
            let mut record = Record::new();
            for column in &columns {
                let cell = table.value(row, column).ok_or_else(|| {
                    TabularError::schema_mismatch(format!("table is missing column '{column}'"))
                })?;
                record = record.with(column.clone(), cell.clone());
            }
            out.push(self.predict_record(&record)?);
        }
        Ok(out)
    }
}

/// Turn an imputed, encoded table into the feature matrix and label vector,
/// columns in schema order.
fn assemble(table: &Table, schema: &FeatureSchema) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_rows = table.n_rows();
    let n_features = schema.n_features();

    let mut x = Array2::<f64>::zeros((n_rows, n_features));
    for (j, (column, _)) in schema.feature_columns().enumerate() {
        let values = table.column_values(column)?;
        for (i, cell) in values.into_iter().enumerate() {
            x[[i, j]] = cell.as_number(column)?;
        }
    }

    let target = schema.target();
    let mut y = Array1::<f64>::zeros(n_rows);
    for (i, cell) in table.column_values(target)?.into_iter().enumerate() {
        y[i] = cell.as_number(target)?;
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogisticRegression, MajorityClass};
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

    // 10 rows, 2 features: older males mostly died, younger females mostly
    // survived, which is separable enough for the logistic model.
    fn ten_rows() -> Table {
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

    fn fit_logistic(table: &Table) -> (FittedPipeline, EvaluationReport) {
        let config = PipelineConfig {
            epochs: 1000,
            ..PipelineConfig::default()
        };
        FittedPipeline::fit(
            table,
            &schema(),
            &LogisticRegression::new()
                .with_learning_rate(config.learning_rate)
                .with_epochs(config.epochs),
            &config,
        )
        .unwrap()
    }

    #[test]
    fn test_end_to_end_record_matches_batch_prediction() {
        let table = ten_rows();
        let (pipeline, report) = fit_logistic(&table);
        assert!((0.0..=1.0).contains(&report.accuracy));

        // A record identical to a training row must reproduce that row's
        // training-time prediction through the single-record path.
        let batch = pipeline.predict_table(&table).unwrap();
        for row in 0..table.n_rows() {
            let record = Record::new()
                .with("age", table.value(row, "age").unwrap().clone())
                .with("sex", table.value(row, "sex").unwrap().clone());
            let single = pipeline.predict_record(&record).unwrap();
            assert_eq!(single, batch[row], "row {row} diverged");
        }
    }

    #[test]
    fn test_gateway_rejects_unseen_category() {
        let (pipeline, _) = fit_logistic(&ten_rows());

        let record = Record::new()
            .with("age", RawValue::Number(30.0))
            .with("sex", RawValue::text("unknown_port"));

        let err = pipeline.predict_record(&record).unwrap_err();
        assert!(matches!(
            err,
            TabularError::UnknownCategory { column, value }
                if column == "sex" && value == "unknown_port"
        ));
    }

    #[test]
    fn test_constant_numeric_column_never_yields_nan() {
        // Every age identical: zero variance in training no matter the split.
        let rows: Vec<Vec<RawValue>> = (0..10)
            .map(|i| {
                vec![
                    RawValue::Number(30.0),
                    RawValue::text(if i % 2 == 0 { "male" } else { "female" }),
                    RawValue::text(if i % 2 == 0 { "0" } else { "1" }),
                ]
            })
            .collect();
        let table = Table::new(
            vec!["age".into(), "sex".into(), "survived".into()],
            rows,
        )
        .unwrap();

        let (pipeline, report) = fit_logistic(&table);
        assert!(report.accuracy.is_finite());

        let record = Record::new()
            .with("age", RawValue::Number(30.0))
            .with("sex", RawValue::text("male"));
        // std = 1 substitution: prediction succeeds, no divide error.
        pipeline.predict_record(&record).unwrap();
    }

    #[test]
    fn test_same_seed_same_report() {
        let table = ten_rows();
        let (_, a) = fit_logistic(&table);
        let (_, b) = fit_logistic(&table);
        assert_eq!(a.accuracy, b.accuracy);
        assert_eq!(a.confusion, b.confusion);
    }

    #[test]
    fn test_missing_fields_are_imputed_at_inference() {
        let (pipeline, _) = fit_logistic(&ten_rows());

        let record = Record::new()
            .with("age", RawValue::Missing)
            .with("sex", RawValue::text("female"));
        let label = pipeline.predict_record(&record).unwrap();
        assert!(label == "0" || label == "1");
    }

    #[test]
    fn test_record_with_wrong_columns_is_schema_mismatch() {
        let (pipeline, _) = fit_logistic(&ten_rows());

        let missing = Record::new().with("age", RawValue::Number(30.0));
        assert!(matches!(
            pipeline.predict_record(&missing),
            Err(TabularError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_pipeline_is_polymorphic_over_the_model() {
        let table = ten_rows();
        let config = PipelineConfig::default();
        let (pipeline, report) =
            FittedPipeline::fit(&table, &schema(), &MajorityClass::new(), &config).unwrap();

        assert_eq!(pipeline.classifier_name(), "majority_class");
        // No scores from the baseline: curves degrade to a note.
        assert!(report.roc.is_none());
        assert!(!report.notes.is_empty());

        let record = Record::new()
            .with("age", RawValue::Number(25.0))
            .with("sex", RawValue::text("female"));
        let label = pipeline.predict_record(&record).unwrap();
        assert!(label == "0" || label == "1");
    }

    #[test]
    fn test_bundle_is_shareable_across_threads() {
        let (pipeline, _) = fit_logistic(&ten_rows());
        let pipeline = std::sync::Arc::new(pipeline);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let p = std::sync::Arc::clone(&pipeline);
                std::thread::spawn(move || {
                    let record = Record::new()
                        .with("age", RawValue::Number(20.0 + i as f64))
                        .with("sex", RawValue::text("male"));
                    p.predict_record(&record).unwrap()
                })
            })
            .collect();
        for handle in handles {
            let label = handle.join().unwrap();
            assert!(label == "0" || label == "1");
        }
    }
}

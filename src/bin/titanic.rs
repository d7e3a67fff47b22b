//! Titanic survival demo
//!
//! Trains a classifier on a small passenger dataset (or a CSV you supply),
//! prints the held-out evaluation, and scores one example passenger.

use clap::{Parser, ValueEnum};
use tablearn::{
    ClassifierKind, ColumnRole, FeatureSchema, PipelineConfig, RawValue, Record, Result, Table,
    Workflow,
};
use tracing_subscriber::EnvFilter;

// A slice of the classic dataset, with the usual holes in `age` and
// `embarked`, so the imputer has real work to do.
const SAMPLE_CSV: &str = "\
pclass,sex,age,fare,embarked,survived
3,male,22,7.25,S,0
1,female,38,71.28,C,1
3,female,26,7.92,S,1
1,female,35,53.1,S,1
3,male,35,8.05,S,0
3,male,,8.46,Q,0
1,male,54,51.86,S,0
3,male,2,21.07,S,0
3,female,27,11.13,S,1
2,female,14,30.07,C,1
3,female,4,16.7,S,1
1,female,58,26.55,S,1
3,male,20,8.05,S,0
3,male,39,31.28,S,0
3,female,14,7.85,S,0
2,female,55,16.0,S,1
3,male,,29.13,Q,0
2,male,,13.0,S,1
3,female,31,18.0,,0
3,female,,7.22,C,1
2,male,35,26.0,S,0
2,male,34,13.0,S,1
3,female,15,8.03,Q,1
1,male,28,35.5,S,1
3,female,8,21.07,S,0
3,female,38,31.39,S,1
3,male,,7.23,C,0
1,male,19,263.0,S,0
3,female,,7.88,Q,1
3,male,,7.9,S,0
";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClassifierArg {
    Logistic,
    Majority,
}

impl From<ClassifierArg> for ClassifierKind {
    fn from(arg: ClassifierArg) -> Self {
        match arg {
            ClassifierArg::Logistic => ClassifierKind::Logistic,
            ClassifierArg::Majority => ClassifierKind::Majority,
        }
    }
}

#[derive(Parser)]
#[command(name = "titanic")]
#[command(about = "Titanic survival prediction demo", long_about = None)]
struct Cli {
    /// CSV file with pclass,sex,age,fare,embarked,survived columns;
    /// defaults to a small built-in sample
    #[arg(long)]
    csv: Option<String>,

    /// Classifier to train
    #[arg(long, value_enum, default_value_t = ClassifierArg::Logistic)]
    classifier: ClassifierArg,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// Split seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Gradient descent epochs
    #[arg(long, default_value_t = 500)]
    epochs: usize,

    /// Gradient descent learning rate
    #[arg(long, default_value_t = 0.1)]
    lr: f64,

    /// Print the evaluation report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let schema = FeatureSchema::from_pairs(&[
        ("pclass", ColumnRole::Categorical),
        ("sex", ColumnRole::Categorical),
        ("age", ColumnRole::Numeric),
        ("fare", ColumnRole::Numeric),
        ("embarked", ColumnRole::Categorical),
        ("survived", ColumnRole::Target),
    ])?;

    let table = match &cli.csv {
        Some(path) => Table::from_csv_path(path, &schema)?,
        None => Table::from_csv_reader(SAMPLE_CSV.as_bytes(), &schema)?,
    };
    println!("Loaded {} passengers", table.n_rows());

    let config = PipelineConfig {
        test_fraction: cli.test_fraction,
        seed: cli.seed,
        learning_rate: cli.lr,
        epochs: cli.epochs,
    };
    let mut workflow = Workflow::new(table, schema, config)?;
    let report = workflow.train(cli.classifier.into())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("\nClassifier: {}", report.classifier);
        println!("Held-out rows: {}", report.n_test);
        println!("Accuracy: {:.3}", report.accuracy);
        if let Some(auc) = report.roc_auc {
            println!("ROC AUC: {auc:.3}");
        }
        if let Some(confusion) = &report.confusion {
            println!("Confusion matrix (rows = actual, cols = predicted):");
            for (label, row) in report.class_labels.iter().zip(confusion) {
                println!("  {label:>8}: {row:?}");
            }
        }
        for note in &report.notes {
            println!("Note: {note}");
        }
    }

    // Score one passenger, leaving `age` missing so the imputed fill is
    // exercised on the inference path too.
    let passenger = Record::new()
        .with("pclass", RawValue::text("2"))
        .with("sex", RawValue::text("female"))
        .with("age", RawValue::Missing)
        .with("fare", RawValue::Number(30.0))
        .with("embarked", RawValue::text("C"));
    let label = workflow.predict_record(&passenger)?;
    println!("\nExample passenger (2nd class, female, unknown age): survived = {label}");

    Ok(())
}

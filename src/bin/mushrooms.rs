//! Mushroom edibility demo
//!
//! Every feature is categorical, so the whole matrix goes through the
//! codebooks. Also shows what happens when a record carries a category the
//! pipeline never saw during training.

use clap::{Parser, ValueEnum};
use tablearn::{
    ClassifierKind, ColumnRole, FeatureSchema, PipelineConfig, RawValue, Record, Result, Table,
    TabularError, Workflow,
};
use tracing_subscriber::EnvFilter;

// Columns follow the UCI mushroom dataset's single-letter coding
// (odor n = none, f = foul; gill size b = broad, n = narrow; ...).
const SAMPLE_CSV: &str = "\
cap_shape,cap_color,odor,gill_size,gill_color,habitat,class
x,n,p,n,k,u,p
x,y,a,b,k,g,e
b,w,l,b,n,m,e
x,w,p,n,n,u,p
x,g,n,b,k,g,e
x,y,a,b,n,g,e
b,w,a,b,g,m,e
b,w,l,b,n,m,e
x,w,p,n,n,g,p
b,y,a,b,g,m,e
x,y,l,b,g,g,e
x,y,a,b,n,m,e
b,y,a,b,w,g,e
x,w,p,n,w,u,p
x,n,n,b,k,g,e
s,n,f,n,k,u,p
x,g,f,n,n,g,p
f,n,f,n,k,g,p
x,n,p,n,n,u,p
s,w,n,b,k,g,e
f,y,f,n,k,u,p
x,g,n,b,n,g,e
f,g,f,n,n,u,p
x,n,n,b,w,g,e
f,w,f,n,k,g,p
x,y,n,b,w,m,e
f,n,p,n,k,u,p
s,g,n,b,k,g,e
f,g,f,n,k,u,p
x,w,l,b,n,m,e
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
#[command(name = "mushrooms")]
#[command(about = "Mushroom edibility classification demo", long_about = None)]
struct Cli {
    /// CSV file with cap_shape,cap_color,odor,gill_size,gill_color,habitat,class
    /// columns; defaults to a small built-in sample
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
        ("cap_shape", ColumnRole::Categorical),
        ("cap_color", ColumnRole::Categorical),
        ("odor", ColumnRole::Categorical),
        ("gill_size", ColumnRole::Categorical),
        ("gill_color", ColumnRole::Categorical),
        ("habitat", ColumnRole::Categorical),
        ("class", ColumnRole::Target),
    ])?;

    let table = match &cli.csv {
        Some(path) => Table::from_csv_path(path, &schema)?,
        None => Table::from_csv_reader(SAMPLE_CSV.as_bytes(), &schema)?,
    };
    println!("Loaded {} mushrooms", table.n_rows());

    let config = PipelineConfig {
        test_fraction: cli.test_fraction,
        seed: cli.seed,
        ..PipelineConfig::default()
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

    let foul_smelling = Record::new()
        .with("cap_shape", RawValue::text("x"))
        .with("cap_color", RawValue::text("n"))
        .with("odor", RawValue::text("f"))
        .with("gill_size", RawValue::text("n"))
        .with("gill_color", RawValue::text("k"))
        .with("habitat", RawValue::text("u"));
    let label = workflow.predict_record(&foul_smelling)?;
    println!("\nFoul-smelling narrow-gilled sample: class = {label}");

    // A cap color no training row had. The pipeline refuses to guess.
    let novel = Record::new()
        .with("cap_shape", RawValue::text("x"))
        .with("cap_color", RawValue::text("z"))
        .with("odor", RawValue::text("n"))
        .with("gill_size", RawValue::text("b"))
        .with("gill_color", RawValue::text("k"))
        .with("habitat", RawValue::text("g"));
    match workflow.predict_record(&novel) {
        Err(TabularError::UnknownCategory { column, value }) => {
            println!("Sample with unseen {column} '{value}' was refused, as it should be");
        }
        Ok(label) => println!("Unexpected: novel sample was classified as {label}"),
        Err(e) => return Err(e),
    }

    Ok(())
}

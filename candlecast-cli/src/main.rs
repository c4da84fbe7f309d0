//! Candlecast CLI: feature export, model training, next-close prediction.
//!
//! Commands:
//! - `features`: compute the feature table for a CSV file or directory
//! - `train`: fit a configured model and report train/holdout error
//! - `predict`: train on one file and print the next-close prediction

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use candlecast_core::config::ModelConfig;
use candlecast_core::data::{group_by_symbol, synthetic_bars, BarSource, CsvLoader};
use candlecast_core::domain::{Bar, FeatureRow};
use candlecast_core::features::{make_features, FEATURE_NAMES};
use candlecast_core::metrics::ErrorSummary;
use candlecast_core::predict::{next_close_pairs, predict_with, Candle};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(
    name = "candlecast",
    about = "Candlecast CLI: OHLCV features and online learners"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the feature table for a CSV file or a directory of CSV files.
    Features {
        /// CSV file, or directory whose .csv files are loaded (symbol = file stem).
        #[arg(long)]
        input: PathBuf,

        /// Field delimiter.
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Output CSV path. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fit a model on next-close targets and report train/holdout error.
    Train {
        /// CSV file or directory. Required unless --synthetic is given.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Model config TOML. Defaults to a linear model with default settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trailing share of each symbol's examples held out for evaluation.
        #[arg(long, default_value_t = 0.2)]
        holdout: f64,

        /// Train on N synthetic bars instead of reading input.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Field delimiter.
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Print the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Train on one CSV file and print the predicted next close.
    Predict {
        /// CSV file with at least two bars.
        #[arg(long)]
        input: PathBuf,

        /// Model config TOML. Defaults to a linear model with default settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Field delimiter.
        #[arg(long, default_value_t = ',')]
        delimiter: char,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Features {
            input,
            delimiter,
            output,
        } => run_features(&input, delimiter, output.as_deref()),
        Commands::Train {
            input,
            config,
            holdout,
            synthetic,
            seed,
            delimiter,
            json,
        } => run_train(
            input.as_deref(),
            config.as_deref(),
            holdout,
            synthetic,
            seed,
            delimiter,
            json,
        ),
        Commands::Predict {
            input,
            config,
            delimiter,
        } => run_predict(&input, config.as_deref(), delimiter),
    }
}

fn loader(delimiter: char) -> Result<CsvLoader> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got {delimiter:?}");
    }
    Ok(CsvLoader::new(delimiter as u8))
}

fn load_model_config(path: Option<&Path>) -> Result<ModelConfig> {
    match path {
        Some(path) => ModelConfig::from_file(path)
            .with_context(|| format!("loading model config {}", path.display())),
        None => Ok(ModelConfig::default()),
    }
}

fn run_features(input: &Path, delimiter: char, output: Option<&Path>) -> Result<()> {
    let source = loader(delimiter)?;
    let bars = source
        .load_path(input)
        .with_context(|| format!("loading bars from {}", input.display()))?;

    let mut rows = Vec::with_capacity(bars.len());
    for (symbol, series) in group_by_symbol(bars) {
        let features = make_features(&series);
        info!(%symbol, rows = features.len(), "computed features");
        rows.extend(features);
    }

    let csv = features_to_csv(&rows)?;
    match output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("writing features to {}", path.display()))?;
            info!(path = %path.display(), rows = rows.len(), "wrote feature table");
        }
        None => std::io::stdout()
            .write_all(csv.as_bytes())
            .context("writing features to stdout")?,
    }
    Ok(())
}

/// Header `timestamp,symbol,<feature keys>`; warm-up values print as `NaN`.
fn features_to_csv(rows: &[FeatureRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["timestamp", "symbol"];
    header.extend(FEATURE_NAMES);
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            row.symbol.clone(),
        ];
        record.extend(
            FEATURE_NAMES
                .iter()
                .map(|name| row.get(name).unwrap_or(f64::NAN).to_string()),
        );
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().context("flushing feature CSV")?;
    Ok(String::from_utf8(bytes)?)
}

#[derive(Debug, Serialize)]
struct TrainReport {
    model: &'static str,
    config: ModelConfig,
    symbols: Vec<String>,
    train: ErrorSummary,
    holdout: ErrorSummary,
}

#[allow(clippy::too_many_arguments)]
fn run_train(
    input: Option<&Path>,
    config_path: Option<&Path>,
    holdout: f64,
    synthetic: Option<usize>,
    seed: u64,
    delimiter: char,
    json: bool,
) -> Result<()> {
    if !(0.0..1.0).contains(&holdout) {
        bail!("--holdout must be in [0, 1), got {holdout}");
    }
    let config = load_model_config(config_path)?;

    let bars: Vec<Bar> = match (synthetic, input) {
        (Some(n), _) => synthetic_bars("SYNTH", n, seed),
        (None, Some(path)) => loader(delimiter)?
            .load_path(path)
            .with_context(|| format!("loading bars from {}", path.display()))?,
        (None, None) => bail!("one of --input or --synthetic is required"),
    };

    let report = train_report(config, bars, holdout)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Fit on the leading share of each symbol's examples and score both parts.
fn train_report(config: ModelConfig, bars: Vec<Bar>, holdout: f64) -> Result<TrainReport> {
    let mut symbols = Vec::new();
    let (mut train_rows, mut train_targets) = (Vec::new(), Vec::new());
    let (mut test_rows, mut test_targets) = (Vec::new(), Vec::new());

    for (symbol, series) in group_by_symbol(bars) {
        let (mut rows, mut targets) = next_close_pairs(&series);
        let split = ((1.0 - holdout) * rows.len() as f64).floor() as usize;
        let held_rows = rows.split_off(split);
        let held_targets = targets.split_off(split);
        info!(%symbol, train = rows.len(), holdout = held_rows.len(), "prepared examples");
        test_rows.extend(held_rows);
        test_targets.extend(held_targets);
        train_rows.extend(rows);
        train_targets.extend(targets);
        symbols.push(symbol);
    }

    if train_rows.is_empty() {
        bail!("no training examples: every symbol needs at least two bars");
    }

    let mut model = config.build();
    model
        .fit(&train_rows, &train_targets)
        .context("fitting model")?;

    let train_preds = model.predict_batch(&train_rows);
    let test_preds = model.predict_batch(&test_rows);
    let diverged = train_preds.iter().chain(&test_preds).filter(|p| !p.is_finite()).count();
    if diverged > 0 {
        bail!(
            "{} model diverged: {diverged} non-finite predictions; \
             features are unscaled, so try a smaller learning_rate in the config",
            model.name()
        );
    }

    Ok(TrainReport {
        model: model.name(),
        train: ErrorSummary::compute(&train_preds, &train_targets),
        holdout: ErrorSummary::compute(&test_preds, &test_targets),
        config,
        symbols,
    })
}

fn print_report(report: &TrainReport) {
    println!("=== Training Report ===");
    println!("Model:    {}", report.model);
    println!("Symbols:  {}", report.symbols.join(", "));
    for (label, summary) in [("Train", &report.train), ("Holdout", &report.holdout)] {
        if summary.samples == 0 {
            println!("{label:<8}  (no examples)");
        } else {
            println!(
                "{label:<8}  n={:<6} MSE={:.6}  MAE={:.6}",
                summary.samples, summary.mse, summary.mae
            );
        }
    }
}

fn run_predict(input: &Path, config_path: Option<&Path>, delimiter: char) -> Result<()> {
    let config = load_model_config(config_path)?;
    let bars = loader(delimiter)?
        .load_file(input, None)
        .with_context(|| format!("loading bars from {}", input.display()))?;
    let candles: Vec<Candle> = bars.iter().map(Candle::from).collect();

    let mut model = config.build();
    let prediction =
        predict_with(model.as_mut(), &candles).context("training and predicting")?;

    match bars.last() {
        Some(last) => println!(
            "{} next close after {}: {prediction:.6} ({})",
            last.symbol,
            last.timestamp.format(TIMESTAMP_FORMAT),
            model.name()
        ),
        None => println!("{prediction:.6}"),
    }
    Ok(())
}

//! # ca_forecast
//!
//! Command-line front end: load a price CSV, search memory depths and report
//! the best forecast.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use pattern_forecast::config::ForecastConfig;
use pattern_forecast::data::{CsvSettings, DataLoader};
use pattern_forecast::export::write_combined_to_path;
use pattern_forecast::pipeline::ForecastPipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ca_forecast")]
#[command(about = "Pattern-conditioned ternary state price forecaster", long_about = None)]
struct Cli {
    /// Input CSV with close prices
    #[arg(short, long)]
    input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Training share in percent, overrides the config
    #[arg(long)]
    train_percent: Option<f64>,

    /// Neutral band half-width, overrides the config
    #[arg(short, long)]
    k: Option<f64>,

    /// Laplace smoothing strength, overrides the config
    #[arg(long)]
    alpha: Option<f64>,

    /// Largest memory depth, overrides the config
    #[arg(long)]
    max_memory: Option<usize>,

    /// Evaluate depths in parallel
    #[arg(long)]
    parallel: bool,

    /// First date to keep (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to keep (YYYY-MM-DD)
    #[arg(long)]
    till: Option<NaiveDate>,

    /// Field delimiter, detected when omitted
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Input has no header row
    #[arg(long)]
    no_header: bool,

    /// Write the combined CSV report here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn forecast_config(&self) -> Result<ForecastConfig> {
        let mut config = match &self.config {
            Some(path) => ForecastConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ForecastConfig::default(),
        };

        if let Some(train_percent) = self.train_percent {
            config.train_percent = train_percent;
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(max_memory) = self.max_memory {
            config.max_memory = max_memory;
        }
        config.parallel |= self.parallel;

        config.validate()?;
        Ok(config)
    }

    fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => bail!("Delimiter must be an ASCII character, got '{}'", c),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.forecast_config()?;
    let delimiter = cli.delimiter_byte()?;

    let settings = CsvSettings {
        delimiter,
        has_header: !cli.no_header,
    };
    let mut prices = DataLoader::from_csv(&cli.input, &settings)
        .with_context(|| format!("Failed to load prices from {}", cli.input.display()))?;

    if cli.from.is_some() || cli.till.is_some() {
        let from = cli.from.unwrap_or(NaiveDate::MIN);
        let till = cli.till.unwrap_or(NaiveDate::MAX);
        prices = prices.filter_dates(from, till)?;
    }

    tracing::info!(
        input = %cli.input.display(),
        prices = prices.len(),
        "loaded price series"
    );

    let report = ForecastPipeline::new(config)?.run(&prices)?;

    if let Some(output) = &cli.output {
        write_combined_to_path(output, &report, delimiter.unwrap_or(b';'))
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
        tracing::info!(output = %output.display(), "report written");
    }

    if cli.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let best = &report.outcome.best;
    println!("Best memory: {}", report.best_memory());
    println!("Training returns: {}", report.train_returns_count);
    println!("Forecast steps: {}", best.len());
    print!("{}", best.metrics);

    let relative = &report.relative;
    for (label, value) in [
        ("MAE", relative.mae_percent),
        ("MSE", relative.mse_percent),
        ("RMSE", relative.rmse_percent),
    ] {
        match value {
            Some(v) => println!("  {} relative: {:.4}%", label, v),
            None => println!("  {} relative: n/a", label),
        }
    }

    println!();
    println!("{:>6} {:>12} {:>12} {:>12} {:>10}", "Memory", "MAE", "MSE", "RMSE", "MAPE%");
    for score in &report.outcome.scores {
        println!(
            "{:>6} {:>12.6} {:>12.6} {:>12.6} {:>10.4}",
            score.memory, score.mae, score.mse, score.rmse, score.mape_percent
        );
    }

    Ok(())
}

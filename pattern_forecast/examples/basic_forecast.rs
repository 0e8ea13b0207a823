use chrono::{Duration, NaiveDate};
use pattern_forecast::config::ForecastConfig;
use pattern_forecast::data::PriceSeries;
use pattern_forecast::models::{ForecastModel, RuleTrainer};
use pattern_forecast::pipeline::ForecastPipeline;
use pattern_forecast::series::EncodedSeries;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Pattern Forecast: Basic Forecasting Example");
    println!("===========================================\n");

    // Create sample data
    println!("Creating sample data...");
    let prices = create_sample_daily_data()?;
    println!("Sample data created: {} daily closes\n", prices.len());

    // Inspect the rules of a single depth
    let series = EncodedSeries::encode(prices.prices(), 0.002)?;
    let model = RuleTrainer::new(2, 1.0)?.train(series.states(), series.returns())?;
    println!("Rules learned with memory 2 ({} patterns):", model.pattern_count());
    for (pattern, distribution) in model.rules().iter().take(5) {
        let [down, neutral, up] = distribution.probabilities();
        println!(
            "  {:>8} -> down {:.2}  neutral {:.2}  up {:.2}",
            pattern.to_string(),
            down,
            neutral,
            up
        );
    }

    // Search depths 1..=6
    println!("\nSearching memory depths...");
    let config = ForecastConfig {
        max_memory: 6,
        ..ForecastConfig::default()
    };
    let report = ForecastPipeline::new(config)?.run(&prices)?;

    for score in &report.outcome.scores {
        println!("  m={}  RMSE {:.4}  MAPE {:.3}%", score.memory, score.rmse, score.mape_percent);
    }

    println!("\nBest memory: {}", report.best_memory());
    println!("{}", report.outcome.best.metrics);

    println!("Last forecast points:");
    for point in report.points().iter().rev().take(5).rev() {
        let date = point.date.map(|d| d.to_string()).unwrap_or_default();
        println!(
            "  {}  actual {:.2}  predicted {:.2}",
            date, point.actual_price, point.predicted_price
        );
    }

    Ok(())
}

// Helper function to create a deterministic daily close series
fn create_sample_daily_data() -> pattern_forecast::error::Result<PriceSeries> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();
    let mut price = 100.0;
    let mut prices = Vec::with_capacity(120);
    let mut dates = Vec::with_capacity(120);

    for i in 0..120i64 {
        // Trend with a weekly swing
        let swing = ((i % 7) as f64 - 3.0) * 0.004;
        price *= 1.0 + 0.001 + swing;
        prices.push(price);
        dates.push(Some(start + Duration::days(i)));
    }

    PriceSeries::new(prices, dates)
}

use chrono::NaiveDate;
use pattern_forecast::config::ForecastConfig;
use pattern_forecast::data::PriceSeries;
use pattern_forecast::export::{
    write_combined, write_combined_to_path, write_depth_scores_to_path,
    write_forecast_points_to_path,
};
use pattern_forecast::pipeline::{ForecastPipeline, ForecastReport};
use std::fs;
use tempfile::tempdir;

fn sample_report() -> ForecastReport {
    let prices = vec![100.0, 102.0, 101.0, 105.0, 103.0, 108.0, 107.0, 110.0];
    let dates = (1..=8)
        .map(|d| NaiveDate::from_ymd_opt(2024, 5, d))
        .collect();
    let series = PriceSeries::new(prices, dates).unwrap();

    let config = ForecastConfig {
        train_percent: 60.0,
        k: 0.0,
        max_memory: 3,
        ..ForecastConfig::default()
    };

    ForecastPipeline::new(config).unwrap().run(&series).unwrap()
}

#[test]
fn test_combined_report_sections() {
    let report = sample_report();

    let mut out = Vec::new();
    write_combined(&mut out, &report, b';').unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], format!("BestMemory;{}", report.best_memory()));
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "Metrics");
    assert_eq!(lines[3], "Memory;MAE;MSE;RMSE;MAPE");

    let scores = report.outcome.scores.len();
    let forecast_start = 4 + scores;
    assert_eq!(lines[forecast_start], "");
    assert_eq!(lines[forecast_start + 1], "Forecast");
    assert_eq!(lines[forecast_start + 2], "Date;ActualPrice;PredictedPrice");

    let points = &lines[forecast_start + 3..];
    assert_eq!(points.len(), report.outcome.best.len());
    // 7 returns at 60% -> 4 training returns, first forecast lands on the 6th price
    assert!(points[0].starts_with("2024-05-06;108;"));
}

#[test]
fn test_mape_column_is_a_fraction() {
    let report = sample_report();

    let mut out = Vec::new();
    write_combined(&mut out, &report, b',').unwrap();
    let text = String::from_utf8(out).unwrap();

    let first_score = &report.outcome.scores[0];
    let row = text
        .lines()
        .find(|line| line.starts_with(&format!("{},", first_score.memory)))
        .unwrap();
    let mape: f64 = row.rsplit(',').next().unwrap().parse().unwrap();

    assert!((mape - first_score.mape_percent / 100.0).abs() < 1e-12);
}

#[test]
fn test_path_writers() {
    let report = sample_report();
    let dir = tempdir().unwrap();

    let scores_path = dir.path().join("scores.csv");
    let points_path = dir.path().join("forecast.csv");
    let combined_path = dir.path().join("combined.csv");

    write_depth_scores_to_path(&scores_path, &report.outcome.scores, b';').unwrap();
    write_forecast_points_to_path(&points_path, &report.points(), b';').unwrap();
    write_combined_to_path(&combined_path, &report, b';').unwrap();

    let scores = fs::read_to_string(scores_path).unwrap();
    assert_eq!(scores.lines().count(), report.outcome.scores.len() + 1);

    let points = fs::read_to_string(points_path).unwrap();
    assert_eq!(points.lines().count(), report.points().len() + 1);

    let combined = fs::read_to_string(combined_path).unwrap();
    assert!(combined.starts_with("BestMemory;"));
}

//! CSV reports of grid search scores and forecasts
//!
//! MAPE is written as a fraction (`0.05` for 5%) and dates as `YYYY-MM-DD`,
//! empty when unknown.

use crate::error::Result;
use crate::grid_search::DepthScore;
use crate::pipeline::{ForecastPoint, ForecastReport};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const SCORE_HEADER: [&str; 5] = ["Memory", "MAE", "MSE", "RMSE", "MAPE"];
const FORECAST_HEADER: [&str; 3] = ["Date", "ActualPrice", "PredictedPrice"];

fn csv_writer<W: Write>(writer: W, delimiter: u8) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer)
}

fn write_score_rows<W: Write>(csv: &mut Writer<W>, scores: &[DepthScore]) -> Result<()> {
    csv.write_record(SCORE_HEADER)?;
    for score in scores {
        csv.write_record([
            score.memory.to_string(),
            score.mae.to_string(),
            score.mse.to_string(),
            score.rmse.to_string(),
            (score.mape_percent / 100.0).to_string(),
        ])?;
    }
    Ok(())
}

fn write_point_rows<W: Write>(csv: &mut Writer<W>, points: &[ForecastPoint]) -> Result<()> {
    csv.write_record(FORECAST_HEADER)?;
    for point in points {
        let date = point
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        csv.write_record([
            date,
            point.actual_price.to_string(),
            point.predicted_price.to_string(),
        ])?;
    }
    Ok(())
}

/// Write one row per evaluated depth
pub fn write_depth_scores<W: Write>(writer: W, scores: &[DepthScore], delimiter: u8) -> Result<()> {
    let mut csv = csv_writer(writer, delimiter);
    write_score_rows(&mut csv, scores)?;
    csv.flush()?;
    Ok(())
}

/// Write one row per forecast step
pub fn write_forecast_points<W: Write>(
    writer: W,
    points: &[ForecastPoint],
    delimiter: u8,
) -> Result<()> {
    let mut csv = csv_writer(writer, delimiter);
    write_point_rows(&mut csv, points)?;
    csv.flush()?;
    Ok(())
}

/// Write the best depth, the per-depth scores and the winner's forecast as
/// three sections separated by blank lines
pub fn write_combined<W: Write>(mut writer: W, report: &ForecastReport, delimiter: u8) -> Result<()> {
    {
        let mut csv = csv_writer(&mut writer, delimiter);
        csv.write_record(["BestMemory".to_string(), report.best_memory().to_string()])?;
        csv.flush()?;
    }

    writeln!(writer)?;
    writeln!(writer, "Metrics")?;
    {
        let mut csv = csv_writer(&mut writer, delimiter);
        write_score_rows(&mut csv, &report.outcome.scores)?;
        csv.flush()?;
    }

    writeln!(writer)?;
    writeln!(writer, "Forecast")?;
    {
        let mut csv = csv_writer(&mut writer, delimiter);
        write_point_rows(&mut csv, &report.points())?;
        csv.flush()?;
    }

    writer.flush()?;
    Ok(())
}

/// Write depth scores to a file
pub fn write_depth_scores_to_path<P: AsRef<Path>>(
    path: P,
    scores: &[DepthScore],
    delimiter: u8,
) -> Result<()> {
    write_depth_scores(BufWriter::new(File::create(path)?), scores, delimiter)
}

/// Write forecast steps to a file
pub fn write_forecast_points_to_path<P: AsRef<Path>>(
    path: P,
    points: &[ForecastPoint],
    delimiter: u8,
) -> Result<()> {
    write_forecast_points(BufWriter::new(File::create(path)?), points, delimiter)
}

/// Write the combined report to a file
pub fn write_combined_to_path<P: AsRef<Path>>(
    path: P,
    report: &ForecastReport,
    delimiter: u8,
) -> Result<()> {
    write_combined(BufWriter::new(File::create(path)?), report, delimiter)
}

//! Price series loading from delimited text
//!
//! The loader accepts the loose exports produced by spreadsheets and market
//! data terminals: `;` or `,` delimiters, optional header, decimal commas and
//! trailing metadata blocks after a `history.cursor` marker line. Quote
//! characters are kept as literal text.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

const SAMPLE_LINES: usize = 10;
const END_OF_DATA_MARKER: &str = "history.cursor";

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y", "%Y%m%d",
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Ordered close prices with optional observation dates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceSeries {
    prices: Vec<f64>,
    dates: Vec<Option<NaiveDate>>,
}

impl PriceSeries {
    /// Create a series from parallel price and date vectors
    pub fn new(prices: Vec<f64>, dates: Vec<Option<NaiveDate>>) -> Result<Self> {
        if prices.len() != dates.len() {
            return Err(ForecastError::DataError(format!(
                "Prices length ({}) doesn't match dates length ({})",
                prices.len(),
                dates.len()
            )));
        }

        Ok(Self { prices, dates })
    }

    /// Create an undated series
    pub fn from_prices(prices: Vec<f64>) -> Self {
        let dates = vec![None; prices.len()];
        Self { prices, dates }
    }

    /// Get the close prices
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Get the dates, one per price
    pub fn dates(&self) -> &[Option<NaiveDate>] {
        &self.dates
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// True when there are no observations
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// True when at least one observation carries a date
    pub fn has_dates(&self) -> bool {
        self.dates.iter().any(Option::is_some)
    }

    /// Keep observations dated within `[from, till]`.
    ///
    /// Undated rows are dropped when the series has any dates at all; a fully
    /// undated series is returned unchanged.
    pub fn filter_dates(&self, from: NaiveDate, till: NaiveDate) -> Result<Self> {
        if till < from {
            return Err(ForecastError::InvalidParameter(format!(
                "End date {} is before start date {}",
                till, from
            )));
        }

        if !self.has_dates() {
            return Ok(self.clone());
        }

        let (prices, dates): (Vec<f64>, Vec<Option<NaiveDate>>) = self
            .prices
            .iter()
            .zip(self.dates.iter())
            .filter_map(|(&price, date)| match date {
                Some(d) if *d >= from && *d <= till => Some((price, Some(*d))),
                _ => None,
            })
            .unzip();

        if prices.len() < 2 {
            return Err(ForecastError::DataError(format!(
                "Fewer than two prices remain between {} and {}",
                from, till
            )));
        }

        Ok(Self { prices, dates })
    }
}

/// Settings for reading delimited price files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvSettings {
    /// Field delimiter, detected from the data when `None`
    pub delimiter: Option<u8>,
    /// Whether the first non-empty line is a header
    pub has_header: bool,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
        }
    }
}

/// Data loader for price series
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a price series from a delimited text file
    pub fn from_csv<P: AsRef<Path>>(path: P, settings: &CsvSettings) -> Result<PriceSeries> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text, settings)
    }

    /// Load a price series from any reader
    pub fn from_reader<R: Read>(mut reader: R, settings: &CsvSettings) -> Result<PriceSeries> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_text(&text, settings)
    }

    /// Load a price series from delimited text
    pub fn from_text(text: &str, settings: &CsvSettings) -> Result<PriceSeries> {
        let sample: Vec<&str> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(SAMPLE_LINES)
            .collect();

        if sample.is_empty() {
            return Err(ForecastError::DataError("CSV input is empty".to_string()));
        }

        let delimiter = settings
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(&sample));

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut rows: Vec<(u64, StringRecord)> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            if Self::is_end_of_data(&record) {
                break;
            }
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            rows.push((line, record));
        }

        let (header, data_rows) = if settings.has_header && !rows.is_empty() {
            let (_, header) = rows.remove(0);
            (Some(header), rows)
        } else {
            (None, rows)
        };

        let (close_index, date_index) = Self::resolve_columns(header.as_ref(), &data_rows);
        debug!(
            delimiter = %(delimiter as char),
            close_index,
            date_index = ?date_index,
            "resolved CSV columns"
        );

        let mut prices = Vec::with_capacity(data_rows.len());
        let mut dates = Vec::with_capacity(data_rows.len());

        for (line, record) in &data_rows {
            let close_value = record.get(close_index).unwrap_or("");
            match parse_number(close_value) {
                Some(price) => {
                    prices.push(price);
                    dates.push(date_index.and_then(|i| record.get(i)).and_then(parse_date));
                }
                None if Self::is_ignorable(record, close_value) => {
                    warn!(line, "skipping non-data line");
                }
                None => {
                    return Err(ForecastError::DataError(format!(
                        "Cannot parse close value on line {}: '{}'",
                        line, close_value
                    )));
                }
            }
        }

        if prices.len() < 2 {
            return Err(ForecastError::DataError(format!(
                "At least two close prices are required, found {}",
                prices.len()
            )));
        }

        PriceSeries::new(prices, dates)
    }

    /// Pick `;` when it outnumbers `,` in the sample, `,` otherwise
    fn detect_delimiter(sample: &[&str]) -> u8 {
        let (commas, semicolons) = sample.iter().fold((0, 0), |(c, s), line| {
            (
                c + line.matches(',').count(),
                s + line.matches(';').count(),
            )
        });

        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }

    /// Close and date column positions
    fn resolve_columns(
        header: Option<&StringRecord>,
        data_rows: &[(u64, StringRecord)],
    ) -> (usize, Option<usize>) {
        let first_row = data_rows.first().map(|(_, record)| record);

        match header {
            Some(header) => {
                let find = |name: &str| header.iter().position(|h| h.eq_ignore_ascii_case(name));

                if let Some(close) = find("close") {
                    return (close, find("date"));
                }

                match first_row {
                    Some(row) if row.len() >= 2 && parse_number(&row[1]).is_some() => (1, Some(0)),
                    _ => (0, None),
                }
            }
            None => match first_row {
                Some(row) if row.len() > 1 => (1, Some(0)),
                _ => (0, None),
            },
        }
    }

    fn is_end_of_data(record: &StringRecord) -> bool {
        record
            .get(0)
            .map(|field| field.to_ascii_lowercase().starts_with(END_OF_DATA_MARKER))
            .unwrap_or(false)
    }

    /// Comment lines and digit-free lines without a close value
    fn is_ignorable(record: &StringRecord, close_value: &str) -> bool {
        if record.get(0).map_or(false, |f| f.starts_with('#')) {
            return true;
        }

        close_value.is_empty() && !record.iter().any(|f| f.chars().any(|c| c.is_ascii_digit()))
    }
}

/// Parse a number, accepting a decimal comma and space thousands separators
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    value.parse::<f64>().ok().or_else(|| {
        value
            .replace(|c: char| c == ' ' || c == '\u{a0}', "")
            .replace(',', ".")
            .parse::<f64>()
            .ok()
    })
}

/// Parse a date or date-time, keeping only the calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

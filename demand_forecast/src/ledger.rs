//! Sales ledger handling
//!
//! The ledger is kept as a polars `DataFrame` exactly as supplied so the
//! validator can inspect its schema. Typed [`SalesRecord`]s are only
//! extracted once feature construction starts.

use crate::error::{ForecastError, Result};
use crate::validation;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Days between 0001-01-01 (day 1 of the common era) and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Date layouts accepted in text `date` columns
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// One row of the input ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Calendar date of the sales count
    pub date: NaiveDate,
    /// Store key
    pub store_id: i64,
    /// Item key
    pub item_id: i64,
    /// Units sold
    pub sales: f64,
}

impl SalesRecord {
    /// Create a new sales record
    pub fn new(date: NaiveDate, store_id: i64, item_id: i64, sales: f64) -> Self {
        Self {
            date,
            store_id,
            item_id,
            sales,
        }
    }

    /// The (store_id, item_id) partition this record belongs to
    pub fn partition_key(&self) -> (i64, i64) {
        (self.store_id, self.item_id)
    }
}

/// Raw sales history for any number of stores and items
#[derive(Debug, Clone)]
pub struct SalesLedger {
    df: DataFrame,
}

impl SalesLedger {
    /// Load a ledger from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(Self { df })
    }

    /// Wrap an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Build a ledger from typed records
    pub fn from_records(records: &[SalesRecord]) -> Result<Self> {
        let days: Vec<i32> = records
            .iter()
            .map(|r| r.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();
        let date_series = Series::new(validation::DATE, days).cast(&DataType::Date)?;
        let store_series = Series::new(
            validation::STORE_ID,
            records.iter().map(|r| r.store_id).collect::<Vec<i64>>(),
        );
        let item_series = Series::new(
            validation::ITEM_ID,
            records.iter().map(|r| r.item_id).collect::<Vec<i64>>(),
        );
        let sales_series = Series::new(
            validation::SALES,
            records.iter().map(|r| r.sales).collect::<Vec<f64>>(),
        );

        let df = DataFrame::new(vec![date_series, store_series, item_series, sales_series])?;
        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Column names in ledger order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Check if the ledger has no rows
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Extract typed records, in ledger order.
    ///
    /// Fails with `SchemaError` if a required column is absent and with
    /// `ParseError` on the first value that cannot be converted.
    pub fn records(&self) -> Result<Vec<SalesRecord>> {
        validation::validate(self)?;

        let dates = parse_dates(self.df.column(validation::DATE)?)?;
        let store_ids = integer_column(self.df.column(validation::STORE_ID)?)?;
        let item_ids = integer_column(self.df.column(validation::ITEM_ID)?)?;
        let sales = numeric_column(self.df.column(validation::SALES)?)?;

        Ok(dates
            .into_iter()
            .zip(store_ids)
            .zip(item_ids)
            .zip(sales)
            .map(|(((date, store_id), item_id), sales)| {
                SalesRecord::new(date, store_id, item_id, sales)
            })
            .collect())
    }
}

/// Parse an ISO-8601 date, also accepting a trailing time of day
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    Err(ForecastError::ParseError(format!(
        "'{}' is not a valid date",
        value
    )))
}

fn parse_dates(series: &Series) -> Result<Vec<NaiveDate>> {
    match series.dtype() {
        DataType::Utf8 => series
            .utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let value = value.ok_or_else(|| {
                    ForecastError::ParseError(format!("row {}: missing date", row))
                })?;
                parse_date(value).map_err(|_| {
                    ForecastError::ParseError(format!(
                        "row {}: '{}' is not a valid date",
                        row,
                        value.trim()
                    ))
                })
            })
            .collect(),
        DataType::Date | DataType::Datetime(_, _) => {
            let days = series.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    value
                        .and_then(|d| d.checked_add(UNIX_EPOCH_DAYS_FROM_CE))
                        .and_then(NaiveDate::from_num_days_from_ce_opt)
                        .ok_or_else(|| {
                            ForecastError::ParseError(format!(
                                "row {}: missing or out-of-range date",
                                row
                            ))
                        })
                })
                .collect()
        }
        other => Err(ForecastError::ParseError(format!(
            "column '{}' has type {} which cannot hold dates",
            series.name(),
            other
        ))),
    }
}

fn integer_column(series: &Series) -> Result<Vec<i64>> {
    if series.dtype().is_float() {
        return series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if is_integral_i64(v) => Ok(v as i64),
                _ => Err(non_integer(series, row)),
            })
            .collect();
    }

    let cast = series.cast(&DataType::Int64).map_err(|e| {
        ForecastError::ParseError(format!("column '{}' is not integer: {}", series.name(), e))
    })?;

    cast.i64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| non_integer(series, row)))
        .collect()
}

/// Whole number that fits in an `i64` without saturating; `i64::MAX as f64` is 2^63
fn is_integral_i64(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64
}

fn non_integer(series: &Series, row: usize) -> ForecastError {
    ForecastError::ParseError(format!(
        "row {}: missing or non-integer '{}'",
        row,
        series.name()
    ))
}

fn numeric_column(series: &Series) -> Result<Vec<f64>> {
    let cast = series.cast(&DataType::Float64).map_err(|e| {
        ForecastError::ParseError(format!("column '{}' is not numeric: {}", series.name(), e))
    })?;

    cast.f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(ForecastError::ParseError(format!(
                "row {}: missing or non-finite '{}'",
                row,
                series.name()
            ))),
        })
        .collect()
}

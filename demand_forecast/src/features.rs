//! Calendar, lag and rolling-window features
//!
//! Features are position based: a partition is the date-sorted history of
//! one (store_id, item_id) pair, and `lag_7` is the sales value seven rows
//! earlier in that history whether or not the ledger has gaps. Nothing is
//! carried from one partition into the next.

use crate::error::Result;
use crate::ledger::{SalesLedger, SalesRecord};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use stock_math::{lagged, trailing_window_stats};
use tracing::{debug, info};

/// Model inputs, in the order they are handed to the model
pub const FEATURES: [&str; 8] = [
    "lag_1",
    "lag_7",
    "lag_14",
    "rolling_mean_7",
    "rolling_std_7",
    "dayofweek",
    "week",
    "month",
];

/// Lag offsets, in rows
pub const LAGS: [usize; 3] = [1, 7, 14];

/// Size of the trailing sales window
pub const ROLLING_WINDOW: usize = 7;

/// Rows a partition needs before it yields its first complete feature row
pub const MIN_HISTORY: usize = 15;

/// A sales record extended with its derived features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub store_id: i64,
    pub item_id: i64,
    pub sales: f64,
    /// Monday = 0 .. Sunday = 6
    pub dayofweek: u32,
    /// ISO week number
    pub week: u32,
    pub month: u32,
    pub lag_1: f64,
    pub lag_7: f64,
    pub lag_14: f64,
    /// Mean of the 7 sales values before this row
    pub rolling_mean_7: f64,
    /// Sample standard deviation of the same window
    pub rolling_std_7: f64,
}

impl FeatureRow {
    /// All model inputs in [`FEATURES`] order
    pub fn feature_vector(&self) -> [f64; 8] {
        [
            self.lag_1,
            self.lag_7,
            self.lag_14,
            self.rolling_mean_7,
            self.rolling_std_7,
            f64::from(self.dayofweek),
            f64::from(self.week),
            f64::from(self.month),
        ]
    }

    /// The (store_id, item_id) partition this row belongs to
    pub fn partition_key(&self) -> (i64, i64) {
        (self.store_id, self.item_id)
    }
}

/// Derive feature rows from a ledger.
///
/// Rows without a full 14-row lag and 7-row window behind them are dropped,
/// so short partitions contribute nothing. Output is ordered by store, item
/// and date.
pub fn build(ledger: &SalesLedger) -> Result<Vec<FeatureRow>> {
    let records = ledger.records()?;
    build_from_records(records)
}

/// Derive feature rows from already parsed records
pub fn build_from_records(mut records: Vec<SalesRecord>) -> Result<Vec<FeatureRow>> {
    let input_rows = records.len();

    // Stable: duplicates of the same date keep their ledger order
    records.sort_by(|a, b| {
        a.partition_key()
            .cmp(&b.partition_key())
            .then_with(|| a.date.cmp(&b.date))
    });

    let mut rows = Vec::new();
    let mut partitions = 0usize;
    for partition in records.chunk_by(|a, b| a.partition_key() == b.partition_key()) {
        partitions += 1;
        let built = partition_features(partition)?;
        if built.is_empty() {
            debug!(
                store_id = partition[0].store_id,
                item_id = partition[0].item_id,
                history = partition.len(),
                "partition too short for features"
            );
        }
        rows.extend(built);
    }

    info!(
        input_rows,
        partitions,
        feature_rows = rows.len(),
        "built demand features"
    );

    Ok(rows)
}

/// Features for one date-sorted partition
fn partition_features(partition: &[SalesRecord]) -> Result<Vec<FeatureRow>> {
    let sales: Vec<f64> = partition.iter().map(|r| r.sales).collect();
    let lag_1 = lagged(&sales, LAGS[0]);
    let lag_7 = lagged(&sales, LAGS[1]);
    let lag_14 = lagged(&sales, LAGS[2]);
    let window = trailing_window_stats(&sales, ROLLING_WINDOW)?;

    let rows = partition
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let stats = window[i]?;
            Some(FeatureRow {
                date: record.date,
                store_id: record.store_id,
                item_id: record.item_id,
                sales: record.sales,
                dayofweek: record.date.weekday().num_days_from_monday(),
                week: record.date.iso_week().week(),
                month: record.date.month(),
                lag_1: lag_1[i]?,
                lag_7: lag_7[i]?,
                lag_14: lag_14[i]?,
                rolling_mean_7: stats.mean,
                rolling_std_7: stats.std_dev?,
            })
        })
        .collect();

    Ok(rows)
}

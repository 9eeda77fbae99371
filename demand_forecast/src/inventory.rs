//! Stocking decisions and their cost
//!
//! Stock the forecast plus a safety buffer, rounded half-to-even to whole
//! units, and price the gap to what actually sold.

use crate::error::{ForecastError, Result};
use crate::forecaster::PredictionRow;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use stock_math::round_half_even;
use tracing::info;

/// Columns surfaced to callers, in display order
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "store_id",
    "item_id",
    "sales",
    "predicted_sales",
    "recommended_inventory",
    "estimated_cost",
];

/// Per-unit prices of a stocking mistake
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    /// Cost of each unit of demand that could not be served
    pub understock_cost: f64,
    /// Cost of each unit left over
    pub overstock_cost: f64,
}

impl CostParams {
    /// Create cost parameters, both of which must be finite and non-negative
    pub fn new(understock_cost: f64, overstock_cost: f64) -> Result<Self> {
        let costs = Self {
            understock_cost,
            overstock_cost,
        };
        costs.validate()?;
        Ok(costs)
    }

    /// Check both costs are finite and non-negative
    pub fn validate(&self) -> Result<()> {
        check_non_negative("understock_cost", self.understock_cost)?;
        check_non_negative("overstock_cost", self.overstock_cost)
    }
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            understock_cost: 10.0,
            overstock_cost: 2.0,
        }
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ForecastError::InvalidInputError(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    }
}

/// A prediction row with its stocking decision and cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRow {
    #[serde(flatten)]
    pub prediction: PredictionRow,
    /// Whole units to stock
    pub recommended_inventory: f64,
    /// Demand left unserved
    pub understock_units: f64,
    /// Units left on the shelf
    pub overstock_units: f64,
    pub estimated_cost: f64,
}

impl RecommendationRow {
    pub fn store_id(&self) -> i64 {
        self.prediction.features.store_id
    }

    pub fn item_id(&self) -> i64 {
        self.prediction.features.item_id
    }

    pub fn sales(&self) -> f64 {
        self.prediction.features.sales
    }

    pub fn predicted_sales(&self) -> f64 {
        self.prediction.predicted_sales
    }

    /// Projection onto [`OUTPUT_COLUMNS`]
    pub fn to_record(&self) -> RecommendationRecord {
        RecommendationRecord {
            store_id: self.store_id(),
            item_id: self.item_id(),
            sales: self.sales(),
            predicted_sales: self.predicted_sales(),
            recommended_inventory: self.recommended_inventory,
            estimated_cost: self.estimated_cost,
        }
    }
}

/// Externally surfaced columns of a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub store_id: i64,
    pub item_id: i64,
    pub sales: f64,
    pub predicted_sales: f64,
    pub recommended_inventory: f64,
    pub estimated_cost: f64,
}

/// Decide a stock level for every row and price it against actual sales.
///
/// `recommended_inventory = round_half_even(predicted_sales + safety_stock)`.
/// Fails with `InvalidInputError` on a non-finite prediction and on a
/// negative or non-finite safety stock or cost.
pub fn decide(
    rows: &[PredictionRow],
    safety_stock: f64,
    understock_cost: f64,
    overstock_cost: f64,
) -> Result<Vec<RecommendationRow>> {
    check_predictions(rows)?;
    check_non_negative("safety_stock", safety_stock)?;
    let costs = CostParams::new(understock_cost, overstock_cost)?;

    Ok(rows
        .iter()
        .map(|row| decide_row(row, safety_stock, &costs))
        .collect())
}

/// Fail with `InvalidInputError` naming the first row whose prediction or
/// sales value is not finite
pub fn check_predictions(rows: &[PredictionRow]) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if !row.predicted_sales.is_finite() {
            return Err(ForecastError::InvalidInputError(format!(
                "row {} (store {}, item {}): predicted_sales is {}",
                index, row.features.store_id, row.features.item_id, row.predicted_sales
            )));
        }
        if !row.sales().is_finite() {
            return Err(ForecastError::InvalidInputError(format!(
                "row {}: sales is {}",
                index,
                row.sales()
            )));
        }
    }
    Ok(())
}

fn decide_row(row: &PredictionRow, safety_stock: f64, costs: &CostParams) -> RecommendationRow {
    let recommended_inventory = round_half_even(row.predicted_sales + safety_stock);
    let understock_units = (row.sales() - recommended_inventory).max(0.0);
    let overstock_units = (recommended_inventory - row.sales()).max(0.0);
    let estimated_cost =
        understock_units * costs.understock_cost + overstock_units * costs.overstock_cost;

    RecommendationRow {
        prediction: row.clone(),
        recommended_inventory,
        understock_units,
        overstock_units,
        estimated_cost,
    }
}

/// Recommendations for one run, with the parameters that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTable {
    rows: Vec<RecommendationRow>,
    safety_stock: f64,
    costs: CostParams,
}

impl RecommendationTable {
    /// Decide every row and collect the result into a table
    pub fn decide(rows: &[PredictionRow], safety_stock: f64, costs: CostParams) -> Result<Self> {
        let rows = decide(rows, safety_stock, costs.understock_cost, costs.overstock_cost)?;
        let table = Self {
            rows,
            safety_stock,
            costs,
        };

        info!(
            rows = table.len(),
            safety_stock,
            total_cost = table.total_estimated_cost(),
            "decided stock levels"
        );

        Ok(table)
    }

    pub fn rows(&self) -> &[RecommendationRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<RecommendationRow> {
        self.rows
    }

    pub fn safety_stock(&self) -> f64 {
        self.safety_stock
    }

    pub fn costs(&self) -> CostParams {
        self.costs
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the estimated cost over all rows
    pub fn total_estimated_cost(&self) -> f64 {
        self.rows.iter().map(|r| r.estimated_cost).sum()
    }

    pub fn total_understock_units(&self) -> f64 {
        self.rows.iter().map(|r| r.understock_units).sum()
    }

    pub fn total_overstock_units(&self) -> f64 {
        self.rows.iter().map(|r| r.overstock_units).sum()
    }

    /// The first `n` rows
    pub fn preview(&self, n: usize) -> &[RecommendationRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// All rows projected onto [`OUTPUT_COLUMNS`]
    pub fn records(&self) -> Vec<RecommendationRecord> {
        self.rows.iter().map(RecommendationRow::to_record).collect()
    }

    /// The surfaced columns as a DataFrame
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let records = self.records();
        let df = DataFrame::new(vec![
            Series::new(
                OUTPUT_COLUMNS[0],
                records.iter().map(|r| r.store_id).collect::<Vec<i64>>(),
            ),
            Series::new(
                OUTPUT_COLUMNS[1],
                records.iter().map(|r| r.item_id).collect::<Vec<i64>>(),
            ),
            Series::new(
                OUTPUT_COLUMNS[2],
                records.iter().map(|r| r.sales).collect::<Vec<f64>>(),
            ),
            Series::new(
                OUTPUT_COLUMNS[3],
                records.iter().map(|r| r.predicted_sales).collect::<Vec<f64>>(),
            ),
            Series::new(
                OUTPUT_COLUMNS[4],
                records
                    .iter()
                    .map(|r| r.recommended_inventory)
                    .collect::<Vec<f64>>(),
            ),
            Series::new(
                OUTPUT_COLUMNS[5],
                records.iter().map(|r| r.estimated_cost).collect::<Vec<f64>>(),
            ),
        ])?;

        Ok(df)
    }

    /// Write the surfaced columns as CSV with a header row
    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        // An empty table still gets its header
        if self.rows.is_empty() {
            writer.write_record(OUTPUT_COLUMNS)?;
        }
        for record in self.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the surfaced columns to a CSV file
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv_to(file)
    }
}

//! Run configuration
//!
//! There is no global configuration: a `PipelineConfig` is built (or read
//! from a JSON file) by the caller and handed to
//! [`InventoryPipeline::from_config`](crate::pipeline::InventoryPipeline::from_config).

use crate::error::{ForecastError, Result};
use crate::inventory::CostParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the safety-stock buffer comes from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "value", rename_all = "snake_case")]
pub enum SafetyStockPolicy {
    /// Sample standard deviation of the batch's own predictions
    #[default]
    PredictionDispersion,
    /// A fixed number of units
    Fixed(f64),
}

/// Parameters for one recommendation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Trained model artifact
    pub model_path: PathBuf,
    pub understock_cost: f64,
    pub overstock_cost: f64,
    pub safety_stock: SafetyStockPolicy,
    /// Rows shown when previewing results
    pub preview_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let costs = CostParams::default();
        Self {
            model_path: PathBuf::from("models/demand_forecaster.json"),
            understock_cost: costs.understock_cost,
            overstock_cost: costs.overstock_cost,
            safety_stock: SafetyStockPolicy::default(),
            preview_rows: 50,
        }
    }
}

impl PipelineConfig {
    /// Read a configuration from JSON; absent fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            ForecastError::InvalidInputError(format!("invalid pipeline config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check costs and a fixed safety stock are finite and non-negative
    pub fn validate(&self) -> Result<()> {
        self.costs()?;
        if let SafetyStockPolicy::Fixed(units) = self.safety_stock {
            if !units.is_finite() || units < 0.0 {
                return Err(ForecastError::InvalidInputError(format!(
                    "fixed safety stock must be a finite non-negative number, got {}",
                    units
                )));
            }
        }
        Ok(())
    }

    /// Cost parameters of this run
    pub fn costs(&self) -> Result<CostParams> {
        CostParams::new(self.understock_cost, self.overstock_cost)
    }
}

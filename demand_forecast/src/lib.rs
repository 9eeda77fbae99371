//! # Demand Forecast
//!
//! Turns per-store, per-item daily sales history into stocking
//! recommendations: a demand forecast, a safety-stock buffer, a recommended
//! inventory level and the cost of that level against actual sales.
//!
//! ## Stages
//!
//! - **Validation**: the ledger carries `date`, `store_id`, `item_id`, `sales`
//! - **Features**: calendar fields plus lags 1/7/14 and a trailing 7-row
//!   mean/standard deviation, computed per (store, item)
//! - **Forecasting**: an opaque trained [`DemandModel`] predicts demand per row;
//!   the spread of those predictions is the safety-stock signal
//! - **Inventory**: `round(prediction + safety stock)` priced with
//!   understock/overstock unit costs
//!
//! ## Quick Start
//!
//! ```no_run
//! use demand_forecast::{CostParams, InventoryPipeline, SalesLedger};
//! use demand_forecast::models::load_model;
//!
//! let ledger = SalesLedger::from_csv("sales.csv")?;
//! let model = load_model("models/demand_forecaster.json")?;
//!
//! let pipeline = InventoryPipeline::new(model, CostParams::new(10.0, 2.0)?)?;
//! let table = pipeline.run(&ledger)?;
//!
//! println!("Estimated total cost: {:.2}", table.total_estimated_cost());
//! # Ok::<(), demand_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod pipeline;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use crate::config::{PipelineConfig, SafetyStockPolicy};
pub use crate::error::{ForecastError, Result};
pub use crate::features::{FeatureRow, FEATURES};
pub use crate::forecaster::PredictionRow;
pub use crate::inventory::{
    CostParams, RecommendationRecord, RecommendationRow, RecommendationTable,
};
pub use crate::ledger::{SalesLedger, SalesRecord};
pub use crate::models::{DemandModel, FeatureMatrix, ModelHandle};
pub use crate::pipeline::InventoryPipeline;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

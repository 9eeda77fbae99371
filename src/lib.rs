//! # Stockcast
//!
//! Stocking recommendations from per-store, per-item sales history.
//!
//! This crate bundles the workspace members:
//!
//! - [`demand_forecast`]: ledger validation, feature construction, demand
//!   prediction and the inventory decision rule
//! - [`stock_math`]: lag, trailing-window and rounding calculations
//!
//! ## Example
//!
//! ```
//! use stockcast_workspace::stock_math::round_half_even;
//!
//! assert_eq!(round_half_even(20.5), 20.0);
//! assert_eq!(round_half_even(21.5), 22.0);
//! ```

pub use demand_forecast;
pub use stock_math;

pub use demand_forecast::{
    CostParams, ForecastError, InventoryPipeline, PipelineConfig, RecommendationTable,
    SafetyStockPolicy, SalesLedger,
};

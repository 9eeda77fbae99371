//! End-to-end recommendation run
//!
//! validate -> build features -> predict -> safety stock -> decide. Each
//! step returns new values; the pipeline keeps only the model and the run
//! parameters, so one pipeline can serve any number of ledgers.

use crate::config::{PipelineConfig, SafetyStockPolicy};
use crate::error::Result;
use crate::features;
use crate::forecaster;
use crate::inventory::{self, CostParams, RecommendationTable};
use crate::ledger::SalesLedger;
use crate::models::{load_model, DemandModel, ModelHandle};
use crate::validation;
use tracing::info;

/// A loaded model plus the parameters of a run
#[derive(Debug, Clone)]
pub struct InventoryPipeline {
    model: ModelHandle,
    costs: CostParams,
    safety_stock: SafetyStockPolicy,
}

impl InventoryPipeline {
    /// Create a pipeline using prediction dispersion as safety stock
    pub fn new(model: ModelHandle, costs: CostParams) -> Result<Self> {
        costs.validate()?;
        Ok(Self {
            model,
            costs,
            safety_stock: SafetyStockPolicy::PredictionDispersion,
        })
    }

    /// Load the configured model and take the configured parameters
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        let model = load_model(&config.model_path)?;
        Ok(Self::new(model, config.costs()?)?.with_safety_stock(config.safety_stock))
    }

    /// Replace the safety-stock policy
    pub fn with_safety_stock(mut self, policy: SafetyStockPolicy) -> Self {
        self.safety_stock = policy;
        self
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn costs(&self) -> CostParams {
        self.costs
    }

    pub fn safety_stock_policy(&self) -> SafetyStockPolicy {
        self.safety_stock
    }

    /// Turn a ledger into a cost-annotated recommendation table
    pub fn run(&self, ledger: &SalesLedger) -> Result<RecommendationTable> {
        validation::validate(ledger)?;
        info!(rows = ledger.len(), model = self.model.name(), "starting recommendation run");

        let feature_rows = features::build(ledger)?;
        let predictions = forecaster::predict(&self.model, &feature_rows)?;
        inventory::check_predictions(&predictions)?;

        let safety_stock = match self.safety_stock {
            SafetyStockPolicy::PredictionDispersion => {
                forecaster::prediction_dispersion(&predictions)
            }
            SafetyStockPolicy::Fixed(units) => units,
        };

        RecommendationTable::decide(&predictions, safety_stock, self.costs)
    }
}

//! Applying a demand model to feature rows

use crate::error::{ForecastError, Result};
use crate::features::{FeatureRow, FEATURES};
use crate::models::{DemandModel, FeatureMatrix};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{info, warn};

/// A feature row with the model's demand prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    #[serde(flatten)]
    pub features: FeatureRow,
    pub predicted_sales: f64,
}

impl PredictionRow {
    /// Actual units sold on the row's date
    pub fn sales(&self) -> f64 {
        self.features.sales
    }
}

/// Feature matrix for `rows`, columns in [`FEATURES`] order
pub fn feature_matrix(rows: &[FeatureRow]) -> Result<FeatureMatrix> {
    FeatureMatrix::new(
        FEATURES.iter().map(|name| name.to_string()).collect(),
        rows.iter().map(|row| row.feature_vector().to_vec()).collect(),
    )
}

/// Fail if the model reads a feature this crate never builds
fn check_model_features<M: DemandModel + ?Sized>(model: &M) -> Result<()> {
    let unknown: Vec<String> = model
        .feature_names()
        .into_iter()
        .filter(|name| !FEATURES.contains(&name.as_str()))
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ForecastError::FeatureMismatchError(format!(
            "model '{}' expects features that are not built: {}",
            model.name(),
            unknown.join(", ")
        )))
    }
}

/// Raw model output for `rows`, one value per row
pub fn model_predictions<M: DemandModel + ?Sized>(
    model: &M,
    rows: &[FeatureRow],
) -> Result<Vec<f64>> {
    check_model_features(model)?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let matrix = feature_matrix(rows)?;
    let predictions = model.predict(&matrix)?;
    if predictions.len() != rows.len() {
        return Err(ForecastError::ModelError(format!(
            "model '{}' returned {} predictions for {} rows",
            model.name(),
            predictions.len(),
            rows.len()
        )));
    }

    Ok(predictions)
}

/// Attach a demand prediction to every row, preserving order
pub fn predict<M: DemandModel + ?Sized>(
    model: &M,
    rows: &[FeatureRow],
) -> Result<Vec<PredictionRow>> {
    let predictions = model_predictions(model, rows)?;
    info!(model = model.name(), rows = rows.len(), "predicted demand");

    Ok(rows
        .iter()
        .cloned()
        .zip(predictions)
        .map(|(features, predicted_sales)| PredictionRow {
            features,
            predicted_sales,
        })
        .collect())
}

/// Sample standard deviation of the model's predictions over the batch.
///
/// This single value is the safety-stock signal for every row of the batch.
pub fn dispersion<M: DemandModel + ?Sized>(model: &M, rows: &[FeatureRow]) -> Result<f64> {
    let predictions = model_predictions(model, rows)?;
    Ok(sample_dispersion(&predictions))
}

/// [`dispersion`] computed from rows that already carry predictions
pub fn prediction_dispersion(rows: &[PredictionRow]) -> f64 {
    let predictions: Vec<f64> = rows.iter().map(|row| row.predicted_sales).collect();
    sample_dispersion(&predictions)
}

/// Sample standard deviation, `0.0` when fewer than two values exist
fn sample_dispersion(predictions: &[f64]) -> f64 {
    if predictions.len() < 2 {
        warn!(
            predictions = predictions.len(),
            "too few predictions for a dispersion estimate, using 0"
        );
        return 0.0;
    }

    predictions.iter().std_dev()
}

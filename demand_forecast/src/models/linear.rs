//! Linear regression model

use crate::error::{ForecastError, Result};
use crate::models::{DemandModel, FeatureMatrix};
use serde::{Deserialize, Serialize};

/// `intercept + Σ coefficient_i * feature_i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Features the coefficients apply to, in order
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    /// Create a new linear model
    pub fn new(feature_names: Vec<String>, intercept: f64, coefficients: Vec<f64>) -> Result<Self> {
        let model = Self {
            feature_names,
            intercept,
            coefficients,
        };
        model.check()?;
        Ok(model)
    }

    /// Structural consistency of a deserialized model
    pub fn check(&self) -> Result<()> {
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ForecastError::ModelLoadError(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::ModelLoadError(
                "linear model parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl DemandModel for LinearModel {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        let indices = features.column_indices(&self.feature_names)?;

        Ok(features
            .rows()
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .zip(&self.coefficients)
                    .fold(self.intercept, |acc, (&idx, coef)| acc + coef * row[idx])
            })
            .collect())
    }

    fn feature_names(&self) -> Vec<String> {
        self.feature_names.clone()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_prediction_uses_named_columns() {
        let model = LinearModel::new(
            vec!["lag_1".to_string(), "month".to_string()],
            1.0,
            vec![0.5, 2.0],
        )
        .unwrap();

        // Matrix column order differs from the model's
        let matrix = FeatureMatrix::new(
            vec!["month".to_string(), "lag_1".to_string()],
            vec![vec![3.0, 10.0], vec![1.0, 0.0]],
        )
        .unwrap();

        let predictions = model.predict(&matrix).unwrap();
        assert_relative_eq!(predictions[0], 1.0 + 5.0 + 6.0);
        assert_relative_eq!(predictions[1], 3.0);
    }

    #[test]
    fn test_coefficient_count_must_match() {
        let result = LinearModel::new(vec!["lag_1".to_string()], 0.0, vec![1.0, 2.0]);
        assert!(matches!(result, Err(ForecastError::ModelLoadError(_))));
    }
}

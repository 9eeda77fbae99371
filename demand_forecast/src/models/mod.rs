//! Demand models
//!
//! A trained model is an opaque capability: it receives a matrix of named
//! numeric feature columns and returns one prediction per row. How it was
//! trained is not this crate's concern; [`artifact`] only knows how to load
//! the model kinds below from a JSON file.

use crate::error::{ForecastError, Result};
use crate::features::FEATURES;
use std::fmt::Debug;
use std::sync::Arc;

pub mod artifact;
pub mod linear;
pub mod tree_ensemble;

pub use artifact::{load_model, ArtifactModel, ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use linear::LinearModel;
pub use tree_ensemble::{RegressionTree, TreeEnsemble, TreeNode};

/// Row-major table of named feature columns
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Create a matrix, checking every row has one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ForecastError::InvalidInputError(format!(
                "Row {} has {} values but the matrix has {} columns",
                i,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    /// Column names, in storage order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Check if the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, if present
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// Position of each requested column.
    ///
    /// Fails with `FeatureMismatchError` listing every requested name that is
    /// not in the matrix.
    pub fn column_indices(&self, names: &[String]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(names.len());
        let mut absent = Vec::new();

        for name in names {
            match self.columns.iter().position(|c| c == name) {
                Some(idx) => indices.push(idx),
                None => absent.push(name.as_str()),
            }
        }

        if !absent.is_empty() {
            return Err(ForecastError::FeatureMismatchError(format!(
                "feature columns not available: {}",
                absent.join(", ")
            )));
        }

        Ok(indices)
    }
}

/// A trained regression model that predicts demand from feature columns
pub trait DemandModel: Debug + Send + Sync {
    /// One prediction per matrix row, in row order
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;

    /// Feature columns the model reads, in the order it was trained on
    fn feature_names(&self) -> Vec<String> {
        FEATURES.iter().map(|name| name.to_string()).collect()
    }

    /// Name of the model
    fn name(&self) -> &str;
}

/// Shared, read-only handle to a loaded model
#[derive(Debug, Clone)]
pub struct ModelHandle {
    model: Arc<dyn DemandModel>,
}

impl ModelHandle {
    /// Wrap a model
    pub fn new<M: DemandModel + 'static>(model: M) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

impl DemandModel for ModelHandle {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        self.model.predict(features)
    }

    fn feature_names(&self) -> Vec<String> {
        self.model.feature_names()
    }

    fn name(&self) -> &str {
        self.model.name()
    }
}

//! Loading trained models from disk
//!
//! An artifact is a JSON document naming its model `kind` next to the
//! model's own fields:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "kind": "linear",
//!   "feature_names": ["lag_1", "lag_7"],
//!   "intercept": 0.5,
//!   "coefficients": [0.8, 0.1]
//! }
//! ```

use crate::error::{ForecastError, Result};
use crate::models::{DemandModel, LinearModel, ModelHandle, TreeEnsemble};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Artifact layout version this crate reads
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// The model carried by an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactModel {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

/// On-disk representation of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(flatten)]
    pub model: ArtifactModel,
}

impl ModelArtifact {
    /// Wrap a model in an artifact of the current format version
    pub fn new(model: ArtifactModel) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            model,
        }
    }

    /// Parse an artifact from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| ForecastError::ModelLoadError(format!("malformed model artifact: {}", e)))
    }

    /// Serialize the artifact to JSON text
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForecastError::ModelError(format!("cannot serialize model: {}", e)))
    }

    /// Check compatibility and turn the artifact into a usable model
    pub fn into_handle(self) -> Result<ModelHandle> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ForecastError::ModelLoadError(format!(
                "unsupported artifact format version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        match self.model {
            ArtifactModel::Linear(model) => {
                model.check()?;
                Ok(ModelHandle::new(model))
            }
            ArtifactModel::TreeEnsemble(model) => {
                model.check()?;
                Ok(ModelHandle::new(model))
            }
        }
    }
}

/// Load a trained model from a JSON artifact.
///
/// Every failure (missing file, unreadable file, bad JSON, incompatible
/// content) is reported as `ModelLoadError`.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelHandle> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        ForecastError::ModelLoadError(format!("cannot read {}: {}", path.display(), e))
    })?;

    let handle = ModelArtifact::from_json(&text)?.into_handle()?;
    info!(
        path = %path.display(),
        model = handle.name(),
        features = handle.feature_names().len(),
        "loaded demand model"
    );

    Ok(handle)
}

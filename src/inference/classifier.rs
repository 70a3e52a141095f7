//! Pre-trained model artifacts.

use super::dataset::{FeatureList, FeatureMatrix};
use crate::error::{ServiceError, ServiceResult};
use serde::Deserialize;
use std::path::Path;

/// A trained model that maps feature rows to one value per row.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &FeatureMatrix) -> ServiceResult<Vec<f64>>;
}

/// Linear model stored as JSON:
/// `{"coefficients": [..], "intercept": 0.0, "feature_names": [..]}`.
///
/// `feature_names` is optional; when present it pins the column order the
/// coefficients were fitted against.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl LinearRegression {
    /// Load the artifact and check it against the feature list it will be fed.
    pub fn load(path: &Path, features: &FeatureList) -> ServiceResult<Self> {
        let fail = |reason: String| ServiceError::ArtifactLoadFailure {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| fail(e.to_string()))?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|e| fail(e.to_string()))?;
        model.check_features(features).map_err(fail)?;
        Ok(model)
    }

    fn check_features(&self, features: &FeatureList) -> Result<(), String> {
        if self.coefficients.len() != features.len() {
            return Err(format!(
                "model has {} coefficients but the feature list names {} columns",
                self.coefficients.len(),
                features.len()
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.as_slice() != features.columns() {
                return Err("model feature names do not match the feature list".to_string());
            }
        }
        Ok(())
    }
}

impl Classifier for LinearRegression {
    fn predict(&self, input: &FeatureMatrix) -> ServiceResult<Vec<f64>> {
        input
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != self.coefficients.len() {
                    return Err(ServiceError::Inference(format!(
                        "row {} has {} values, model expects {}",
                        i + 1,
                        row.len(),
                        self.coefficients.len()
                    )));
                }
                let dot: f64 = row.iter().zip(&self.coefficients).map(|(x, w)| x * w).sum();
                Ok(dot + self.intercept)
            })
            .collect()
    }
}

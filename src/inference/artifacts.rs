//! Loading of the classifier and feature list from disk.

use super::classifier::{Classifier, LinearRegression};
use super::dataset::FeatureList;
use crate::config::ModelConfig;
use crate::error::{ServiceError, ServiceResult};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// The classifier together with the feature list it was trained on.
pub struct ModelArtifacts {
    pub classifier: Box<dyn Classifier>,
    pub features: FeatureList,
}

/// Reads artifacts from disk, either on every call or once per process.
pub struct ArtifactLoader {
    classifier_path: PathBuf,
    features_path: PathBuf,
    cache: Option<RwLock<Option<Arc<ModelArtifacts>>>>,
}

impl ArtifactLoader {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            classifier_path: config.classifier_path.clone(),
            features_path: config.features_path.clone(),
            cache: config.cache_artifacts.then(|| RwLock::new(None)),
        }
    }

    pub async fn load(&self) -> ServiceResult<Arc<ModelArtifacts>> {
        let Some(cache) = &self.cache else {
            return self.read_from_disk().await.map(Arc::new);
        };

        if let Some(artifacts) = cache.read().await.as_ref() {
            return Ok(artifacts.clone());
        }

        let mut slot = cache.write().await;
        // Another request may have filled the slot while we waited.
        if let Some(artifacts) = slot.as_ref() {
            return Ok(artifacts.clone());
        }
        let artifacts = Arc::new(self.read_from_disk().await?);
        *slot = Some(artifacts.clone());
        info!(
            classifier = %self.classifier_path.display(),
            features = artifacts.features.len(),
            "Cached model artifacts"
        );
        Ok(artifacts)
    }

    async fn read_from_disk(&self) -> ServiceResult<ModelArtifacts> {
        let classifier_path = self.classifier_path.clone();
        let features_path = self.features_path.clone();

        tokio::task::spawn_blocking(move || -> ServiceResult<ModelArtifacts> {
            let features = FeatureList::load(&features_path)?;
            let classifier = LinearRegression::load(&classifier_path, &features)?;
            Ok(ModelArtifacts {
                classifier: Box::new(classifier),
                features,
            })
        })
        .await
        .map_err(|e| ServiceError::ArtifactLoadFailure {
            path: self.classifier_path.clone(),
            reason: format!("loader task failed: {e}"),
        })?
    }
}

use crate::error::{ServiceError, ServiceResult};
use crate::inference::{ArtifactLoader, FeatureMatrix};
use crate::storage::{NewPrediction, PredictionStore};
use chrono::Utc;
use chrono_tz::Tz;
use tracing::info;

/// Runs uploaded CSV data through the classifier and optionally records
/// every output.
pub struct PredictionService {
    artifacts: ArtifactLoader,
    store: Option<PredictionStore>,
    time_zone: Tz,
}

impl PredictionService {
    /// `store` is `None` when predictions are returned without being saved.
    pub fn new(artifacts: ArtifactLoader, store: Option<PredictionStore>, time_zone: Tz) -> Self {
        Self {
            artifacts,
            store,
            time_zone,
        }
    }

    pub async fn predict(&self, upload: &[u8], file_name: &str) -> ServiceResult<Vec<f64>> {
        let artifacts = self.artifacts.load().await?;
        let input = FeatureMatrix::from_csv(upload, &artifacts.features)?;
        let predictions = artifacts.classifier.predict(&input)?;

        if predictions.len() != input.num_rows() {
            return Err(ServiceError::Inference(format!(
                "model returned {} values for {} rows",
                predictions.len(),
                input.num_rows()
            )));
        }

        if let Some(row) = predictions.iter().position(|value| !value.is_finite()) {
            return Err(ServiceError::Inference(format!(
                "model output for row {} is not a finite number",
                row + 1
            )));
        }

        info!(file_name, rows = input.num_rows(), "Prediction complete");

        if let Some(store) = &self.store {
            let created_at = Utc::now().with_timezone(&self.time_zone).fixed_offset();
            let rows: Vec<NewPrediction> = predictions
                .iter()
                .map(|&prediction| NewPrediction {
                    file_name: file_name.to_string(),
                    prediction,
                    created_at,
                })
                .collect();

            let written = store.append_batch(&rows).await?;
            info!(file_name, rows = written, "Predictions stored");
        }

        Ok(predictions)
    }
}

use crate::storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the item and prediction services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Item not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("uploaded data is missing feature columns: {}", .0.join(", "))]
    MissingFeatureColumns(Vec<String>),

    #[error("malformed CSV upload: {0}")]
    MalformedCsv(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error("failed to load artifact {}: {reason}", path.display())]
    ArtifactLoadFailure { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ServiceError::NotFound,
            StorageError::Database(e) => ServiceError::StoreUnavailable(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

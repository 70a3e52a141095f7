use crate::error::ServiceError;
use crate::service::{ItemService, PredictionService};
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub items: ItemService,
    pub predictions: Arc<PredictionService>,
    pub upload_limit: usize,
}

/// Root greeting
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response from the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<f64>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(String),
    Unprocessable(String),
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err {
            ServiceError::NotFound => AppError::NotFound(message),
            ServiceError::Validation(_) => AppError::Unprocessable(message),
            ServiceError::MissingFeatureColumns(_) | ServiceError::MalformedCsv(_) => {
                AppError::BadRequest(message)
            }
            ServiceError::StoreUnavailable(_)
            | ServiceError::ArtifactLoadFailure { .. }
            | ServiceError::Inference(_) => AppError::Internal(message),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse {
            error: status.to_string(),
            message,
        }))
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::NotFound, StatusCode::NOT_FOUND),
            (ServiceError::Validation("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::MissingFeatureColumns(vec!["area".into()]), StatusCode::BAD_REQUEST),
            (ServiceError::MalformedCsv("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::StoreUnavailable(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ServiceError::ArtifactLoadFailure {
                    path: PathBuf::from("model.json"),
                    reason: "missing".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn oversized_upload_maps_to_413() {
        let response = AppError::PayloadTooLarge("too big".into()).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}

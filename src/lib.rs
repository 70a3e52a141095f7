pub mod api;
pub mod config;
pub mod error;
pub mod inference;
pub mod service;
pub mod storage;

use crate::api::{health_handler, root_handler, AppState};
use crate::config::AppConfig;
use crate::inference::ArtifactLoader;
use crate::service::{ItemService, PredictionService};
use crate::storage::{ItemStore, PredictionStore};
use axum::{routing::get, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes mounted.
pub fn app(state: AppState) -> Router {
    let upload_limit = state.upload_limit;
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(api::items::routes())
        .merge(api::predict::routes(upload_limit))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Wire the services over an open pool.
pub fn build_state(config: &AppConfig, pool: SqlitePool) -> anyhow::Result<AppState> {
    let prediction_store = config
        .model
        .persist_predictions
        .then(|| PredictionStore::new(pool.clone()));

    let predictions = PredictionService::new(
        ArtifactLoader::new(&config.model),
        prediction_store,
        config.model.time_zone()?,
    );

    Ok(AppState {
        items: ItemService::new(ItemStore::new(pool)),
        predictions: Arc::new(predictions),
        upload_limit: config.server.max_upload_bytes,
    })
}

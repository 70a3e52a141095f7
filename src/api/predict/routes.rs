use crate::api::models::AppState;
use crate::api::predict::handlers::predict_handler;
use axum::{extract::DefaultBodyLimit, routing::post, Router};

pub fn routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/predict",
            post(predict_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

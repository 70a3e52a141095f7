pub mod items;
pub mod models;
pub mod predict;

// Re-exports
pub use models::*;

// Root and health handlers (simple, keep here)
use axum::Json;

pub async fn root_handler() -> Json<models::RootResponse> {
    Json(models::RootResponse {
        message: "Hello".to_string(),
    })
}

/// Always 200; the store is not queried.
pub async fn health_handler() -> Json<models::HealthResponse> {
    Json(models::HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

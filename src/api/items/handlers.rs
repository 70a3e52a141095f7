use crate::api::models::*;
use crate::service::Pagination;
use crate::storage::{Item, ItemPatch, NewItem};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use tracing::info;

pub async fn get_item_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.items.get(id).await?))
}

pub async fn create_item_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Json(request) = payload?;
    info!(name = %request.name, "Creating item");
    Ok(Json(state.items.create(request).await?))
}

pub async fn update_item_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    Ok(Json(state.items.update(id, patch).await?))
}

pub async fn delete_item_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Item>, AppError> {
    let Path(id) = id?;
    Ok(Json(state.items.delete(id).await?))
}

pub async fn search_items_handler(
    State(state): State<AppState>,
    query: Result<Path<String>, PathRejection>,
    page: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Item>>, AppError> {
    let Path(query) = query?;
    let Query(page) = page?;
    let items = state.items.search(&query, page).await?;
    info!(query = %query, found = items.len(), "Search complete");
    Ok(Json(items))
}

pub async fn list_items_handler(
    State(state): State<AppState>,
    page: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Item>>, AppError> {
    let Query(page) = page?;
    Ok(Json(state.items.list(page).await?))
}

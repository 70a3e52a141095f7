use crate::error::{ServiceError, ServiceResult};
use crate::storage::{Item, ItemPatch, ItemStore, NewItem, Patch};
use serde::Deserialize;
use tracing::info;

const DEFAULT_LIMIT: u32 = 10;

/// `skip`/`limit` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u32,
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self {
            skip,
            limit: Some(limit),
        }
    }
}

/// CRUD rules for items on top of [`ItemStore`].
#[derive(Clone)]
pub struct ItemService {
    store: ItemStore,
}

impl ItemService {
    pub fn new(store: ItemStore) -> Self {
        Self { store }
    }

    pub async fn create(&self, item: NewItem) -> ServiceResult<Item> {
        validate_name(&item.name)?;
        let created = self.store.insert(&item).await?;
        info!(item_id = created.id, "Item created");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Item> {
        Ok(self.store.get(id).await?)
    }

    /// Apply only the fields present in `patch`.
    pub async fn update(&self, id: i64, patch: ItemPatch) -> ServiceResult<Item> {
        match &patch.name {
            Patch::Null => return Err(ServiceError::Validation("name cannot be null".to_string())),
            Patch::Value(name) => validate_name(name)?,
            Patch::Absent => {}
        }

        let updated = self.store.update(id, &patch).await?;
        info!(item_id = id, "Item updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<Item> {
        let deleted = self.store.delete(id).await?;
        info!(item_id = id, "Item deleted");
        Ok(deleted)
    }

    /// Case-insensitive substring search on the name. Without a `limit`,
    /// every match after `skip` is returned.
    pub async fn search(&self, query: &str, page: Pagination) -> ServiceResult<Vec<Item>> {
        Ok(self.store.search_by_name(query, page.skip, page.limit).await?)
    }

    /// One page of items; `limit` defaults to 10 and has no upper bound.
    pub async fn list(&self, page: Pagination) -> ServiceResult<Vec<Item>> {
        let limit = page.limit.unwrap_or(DEFAULT_LIMIT);
        Ok(self.store.list(page.skip, limit).await?)
    }
}

fn validate_name(name: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::Validation("name cannot be empty".to_string()));
    }
    Ok(())
}

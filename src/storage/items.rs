//! Row access for the `items` table.

use super::StorageError;
use super::models::{Item, ItemPatch, NewItem};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

/// Accessor for the `items` table.
///
/// Every call checks out one pooled connection; it goes back to the pool when
/// the guard drops, on success and on error alike.
#[derive(Clone)]
pub struct ItemStore {
    pool: SqlitePool,
}

impl ItemStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<Item, StorageError> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn insert(&self, item: &NewItem) -> Result<Item, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let id = sqlx::query("INSERT INTO items (name, description) VALUES (?, ?)")
            .bind(&item.name)
            .bind(&item.description)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid();

        debug!(item_id = id, "Inserted item");
        fetch(&mut conn, id).await?.ok_or(StorageError::NotFound)
    }

    /// Read the row, overlay the present patch fields and write it back.
    ///
    /// The read and the write are separate statements; a concurrent delete in
    /// between makes the write a no-op and the final read reports `NotFound`.
    pub async fn update(&self, id: i64, patch: &ItemPatch) -> Result<Item, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let current = fetch(&mut conn, id).await?.ok_or(StorageError::NotFound)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let merged = patch.apply(current);
        sqlx::query("UPDATE items SET name = ?, description = ? WHERE id = ?")
            .bind(&merged.name)
            .bind(&merged.description)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        fetch(&mut conn, id).await?.ok_or(StorageError::NotFound)
    }

    /// Delete the row and hand back what it held.
    pub async fn delete(&self, id: i64) -> Result<Item, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let existing = fetch(&mut conn, id).await?.ok_or(StorageError::NotFound)?;

        sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(existing)
    }

    /// Items whose name contains `needle`, ignoring case. `None` means no limit.
    ///
    /// SQLite's `LOWER` and `LIKE` only fold ASCII, so names are folded here
    /// with full Unicode case mapping instead.
    pub async fn search_by_name(
        &self,
        needle: &str,
        offset: u32,
        limit: Option<u32>,
    ) -> Result<Vec<Item>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, Item>("SELECT id, name, description FROM items ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

        let needle = needle.to_lowercase();
        let matches = rows
            .into_iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .skip(offset as usize);

        Ok(match limit {
            Some(limit) => matches.take(limit as usize).collect(),
            None => matches.collect(),
        })
    }

    pub async fn list(&self, offset: u32, limit: u32) -> Result<Vec<Item>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, name, description FROM items ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as::<_, Item>("SELECT id, name, description FROM items WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Patch;
    use crate::storage::testing::temp_pool;

    fn new_item(name: &str, description: Option<&str>) -> NewItem {
        NewItem {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn insert_then_get_returns_same_row() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);

        let created = store.insert(&new_item("widget", Some("a widget"))).await.unwrap();
        assert_eq!(created.name, "widget");
        assert_eq!(created.description.as_deref(), Some("a widget"));

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_missing_row_is_not_found() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);

        assert!(matches!(store.get(42).await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn update_keeps_fields_not_in_patch() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        let created = store.insert(&new_item("widget", Some("a widget"))).await.unwrap();

        let patch = ItemPatch {
            name: Patch::Value("gizmo".to_string()),
            description: Patch::Absent,
        };
        let updated = store.update(created.id, &patch).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "gizmo");
        assert_eq!(updated.description.as_deref(), Some("a widget"));
        assert_eq!(store.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn update_can_clear_description() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        let created = store.insert(&new_item("widget", Some("a widget"))).await.unwrap();

        let patch = ItemPatch {
            name: Patch::Absent,
            description: Patch::Null,
        };
        let updated = store.update(created.id, &patch).await.unwrap();
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);

        let result = store.update(3, &ItemPatch::default()).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn delete_returns_row_and_removes_it() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        let created = store.insert(&new_item("widget", None)).await.unwrap();

        let deleted = store.delete(created.id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(matches!(store.get(created.id).await, Err(StorageError::NotFound)));
        assert!(matches!(store.delete(created.id).await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn search_ignores_case_and_wildcards() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        for name in ["Blue Widget", "widget", "gadget", "100% cotton", "1000 cotton"] {
            store.insert(&new_item(name, None)).await.unwrap();
        }

        let names = |items: Vec<Item>| items.into_iter().map(|i| i.name).collect::<Vec<_>>();

        let found = store.search_by_name("WIDGET", 0, None).await.unwrap();
        assert_eq!(names(found), vec!["Blue Widget", "widget"]);

        let found = store.search_by_name("0%", 0, None).await.unwrap();
        assert_eq!(names(found), vec!["100% cotton"]);

        let found = store.search_by_name("", 1, Some(2)).await.unwrap();
        assert_eq!(names(found), vec!["widget", "gadget"]);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        for name in ["École", "ÉCOLE NORMALE", "ecole", "Straße"] {
            store.insert(&new_item(name, None)).await.unwrap();
        }

        let names = |items: Vec<Item>| items.into_iter().map(|i| i.name).collect::<Vec<_>>();

        let found = store.search_by_name("École", 0, None).await.unwrap();
        assert_eq!(names(found), vec!["École", "ÉCOLE NORMALE"]);

        let found = store.search_by_name("école", 0, None).await.unwrap();
        assert_eq!(names(found), vec!["École", "ÉCOLE NORMALE"]);

        let found = store.search_by_name("STRASSE", 0, None).await.unwrap();
        assert!(found.is_empty());

        let found = store.search_by_name("STRAßE", 0, Some(1)).await.unwrap();
        assert_eq!(names(found), vec!["Straße"]);
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        let (_dir, pool) = temp_pool().await;
        let store = ItemStore::new(pool);
        for i in 0..5 {
            store.insert(&new_item(&format!("item-{i}"), None)).await.unwrap();
        }

        let page = store.list(1, 2).await.unwrap();
        let names: Vec<_> = page.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["item-1", "item-2"]);

        assert!(store.list(10, 10).await.unwrap().is_empty());
    }
}

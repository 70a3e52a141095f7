//! Append-only access to the `predictions` table.

use super::StorageError;
use super::models::NewPrediction;
use sqlx::SqlitePool;
use tracing::debug;

#[derive(Clone)]
pub struct PredictionStore {
    pool: SqlitePool,
}

impl PredictionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert every row in one transaction. Returns the number of rows written.
    ///
    /// Either all rows land or none do: an error drops the transaction, which
    /// rolls it back.
    pub async fn append_batch(&self, rows: &[NewPrediction]) -> Result<u64, StorageError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for row in rows {
            written += sqlx::query(
                "INSERT INTO predictions (file_name, prediction, created_at) VALUES (?, ?, ?)",
            )
            .bind(&row.file_name)
            .bind(row.prediction)
            .bind(row.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        tx.commit().await?;

        debug!(rows = written, "Appended predictions");
        Ok(written)
    }
}

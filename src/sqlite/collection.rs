use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::StoreError;
use crate::session::ObjectId;
use crate::store::Collection;

/// Session documents in the `sessions` table.
///
/// Documents are stored as JSON text. The primary key on `id` makes
/// concurrent inserts of one id resolve to a single winner.
#[derive(Debug, Clone)]
pub struct SqliteCollection {
    pool: SqlitePool,
}

impl SqliteCollection {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn database_error(operation: &str, e: &sqlx::Error) -> StoreError {
    log::error!(target: "sessionward", "msg=\"database error\", operation=\"{operation}\", error=\"{e}\"");
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl Collection for SqliteCollection {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, id), err))]
    async fn count_id(&self, id: &ObjectId) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE id = ?")
            .bind(id.to_hex())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("count_id", &e))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, id), err))]
    async fn find_id(&self, id: &ObjectId) -> Result<Option<Value>, StoreError> {
        let document: Option<String> =
            sqlx::query_scalar("SELECT document FROM sessions WHERE id = ?")
                .bind(id.to_hex())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| database_error("find_id", &e))?;

        document
            .map(|text| {
                serde_json::from_str(&text).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
    async fn insert(&self, id: &ObjectId, document: Value) -> Result<(), StoreError> {
        let text =
            serde_json::to_string(&document).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let result = sqlx::query("INSERT INTO sessions (id, document) VALUES (?, ?)")
            .bind(id.to_hex())
            .bind(text)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateId(id.to_hex()))
            }
            Err(e) => Err(database_error("insert", &e)),
        }
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, id), err))]
    async fn remove_id(&self, id: &ObjectId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id.to_hex())
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("remove_id", &e))?;

        Ok(())
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("count", &e))?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

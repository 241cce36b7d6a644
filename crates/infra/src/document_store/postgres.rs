//! Postgres-backed document store.
//!
//! All collections share one table:
//!
//! ```sql
//! CREATE TABLE documents (
//!     collection TEXT        NOT NULL,
//!     id         TEXT        NOT NULL,
//!     data       JSONB       NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (collection, id)
//! );
//! ```
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | PoolClosed / PoolTimedOut / Io | `Unavailable` |
//! | Database / other | `Backend` |
//!
//! ## Conditional batches
//!
//! `commit_batch` takes a transaction-scoped advisory lock keyed by the
//! collection name before checking the precondition, so two concurrent
//! "insert if empty" batches serialize and at most one commits.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::instrument;

use chambers_core::DocumentId;

use super::r#trait::{
    BatchOutcome, BatchPrecondition, DocumentStore, Fields, StoreError, StoredDocument, WriteBatch,
};

/// Postgres-backed document store.
///
/// `PgPool` is internally reference-counted, so clones share one pool.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `documents` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT        NOT NULL,
                id         TEXT        NOT NULL,
                data       JSONB       NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{operation}: {err}"))
        }
        other => StoreError::Backend(format!("{operation}: {other}")),
    }
}

fn row_to_document(row: &sqlx::postgres::PgRow) -> Result<StoredDocument, StoreError> {
    let id: String = row.try_get("id").map_err(|e| map_sqlx_error("decode id", e))?;
    let data: JsonValue = row.try_get("data").map_err(|e| map_sqlx_error("decode data", e))?;

    let id = id
        .parse::<DocumentId>()
        .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
    match data {
        JsonValue::Object(data) => Ok(StoredDocument { id, data }),
        other => Err(StoreError::InvalidDocument(format!(
            "document {id} is not a JSON object: {other}"
        ))),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self), err)]
    async fn list(&self, collection: &str, limit: Option<usize>) -> Result<Vec<StoredDocument>, StoreError> {
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));

        let rows = sqlx::query(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(collection)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(row_to_document).collect()
    }

    #[instrument(skip(self, id), fields(id = %id), err)]
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get", e))?;

        row.as_ref().map(row_to_document).transpose()
    }

    #[instrument(skip(self, data), err)]
    async fn add(&self, collection: &str, data: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::generate();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id.as_str())
            .bind(JsonValue::Object(data))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("add", e))?;

        Ok(id)
    }

    #[instrument(skip(self, id, fields), fields(id = %id), err)]
    async fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
        // `||` on JSONB objects is a top-level merge (right side wins).
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(JsonValue::Object(fields))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self, id), fields(id = %id), err)]
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(())
    }

    #[instrument(skip(self, batch), fields(inserts = batch.inserts.len()), err)]
    async fn commit_batch(&self, collection: &str, batch: WriteBatch) -> Result<BatchOutcome, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(collection)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("advisory_lock", e))?;

        if batch.precondition == BatchPrecondition::CollectionEmpty {
            let populated: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM documents WHERE collection = $1)")
                    .bind(collection)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("precondition", e))?;

            if populated {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Ok(BatchOutcome::PreconditionFailed);
            }
        }

        let mut ids = Vec::with_capacity(batch.inserts.len());
        for data in batch.inserts {
            let id = DocumentId::generate();
            sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
                .bind(collection)
                .bind(id.as_str())
                .bind(JsonValue::Object(data))
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("batch insert", e))?;
            ids.push(id);
        }

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(BatchOutcome::Committed(ids))
    }
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use chambers_core::DocumentId;

/// A document body: top-level JSON fields.
pub type Fields = Map<String, JsonValue>;

/// A document as read back from a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub data: Fields,
}

/// Condition evaluated atomically together with a batch write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatchPrecondition {
    /// Always commit.
    None,
    /// Commit only if the collection holds no document at commit time.
    CollectionEmpty,
}

/// A set of inserts committed all-or-nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBatch {
    pub precondition: BatchPrecondition,
    pub inserts: Vec<Fields>,
}

impl WriteBatch {
    pub fn new(inserts: Vec<Fields>) -> Self {
        Self {
            precondition: BatchPrecondition::None,
            inserts,
        }
    }

    /// Insert-if-empty: the check and the inserts happen as one atomic step.
    pub fn if_collection_empty(inserts: Vec<Fields>) -> Self {
        Self {
            precondition: BatchPrecondition::CollectionEmpty,
            inserts,
        }
    }
}

/// Result of a batch commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// All inserts were written; ids are in insert order.
    Committed(Vec<DocumentId>),
    /// The precondition did not hold; nothing was written.
    PreconditionFailed,
}

/// Document store operation error.
///
/// These are **infrastructure errors** (availability, missing targets, bad
/// payloads) as opposed to domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("no document to update at {collection}/{id}")]
    NotFound { collection: String, id: DocumentId },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Collection-scoped document store.
///
/// ## Semantics
///
/// - `list`: documents in insertion order, optionally capped by `limit`
/// - `get`: `Ok(None)` for a missing id (absence is not an error)
/// - `add`: assigns a fresh id
/// - `update`: merges top-level fields into an existing document; a missing
///   document is [`StoreError::NotFound`]
/// - `delete`: removes the document; deleting a missing id succeeds
/// - `commit_batch`: all inserts or none, with the precondition checked in the
///   same atomic step
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, collection: &str, limit: Option<usize>) -> Result<Vec<StoredDocument>, StoreError>;

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError>;

    async fn add(&self, collection: &str, data: Fields) -> Result<DocumentId, StoreError>;

    async fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError>;

    async fn commit_batch(&self, collection: &str, batch: WriteBatch) -> Result<BatchOutcome, StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn list(&self, collection: &str, limit: Option<usize>) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).list(collection, limit).await
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn add(&self, collection: &str, data: Fields) -> Result<DocumentId, StoreError> {
        (**self).add(collection, data).await
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        (**self).delete(collection, id).await
    }

    async fn commit_batch(&self, collection: &str, batch: WriteBatch) -> Result<BatchOutcome, StoreError> {
        (**self).commit_batch(collection, batch).await
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use chambers_core::DocumentId;

use super::r#trait::{
    BatchOutcome, BatchPrecondition, DocumentStore, Fields, StoreError, StoredDocument, WriteBatch,
};

/// In-memory document store.
///
/// Intended for tests/dev. Not optimized for performance: collections are
/// insertion-ordered vectors. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(DocumentId, Fields)>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, collection: &str, limit: Option<usize>) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or_default();

        Ok(docs
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, data)| StoredDocument {
                id: id.clone(),
                data: data.clone(),
            })
            .collect())
    }

    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| doc_id == id))
            .map(|(id, data)| StoredDocument {
                id: id.clone(),
                data: data.clone(),
            }))
    }

    async fn add(&self, collection: &str, data: Fields) -> Result<DocumentId, StoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let id = DocumentId::generate();
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), data));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;

        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;

        // Top-level merge: named fields are replaced, others are kept.
        for (key, value) in fields {
            doc.1.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|(doc_id, _)| doc_id != id);
        }
        Ok(())
    }

    async fn commit_batch(&self, collection: &str, batch: WriteBatch) -> Result<BatchOutcome, StoreError> {
        // Check and insert under one write lock: that is the atomic step.
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let docs = collections.entry(collection.to_string()).or_default();

        if batch.precondition == BatchPrecondition::CollectionEmpty && !docs.is_empty() {
            return Ok(BatchOutcome::PreconditionFailed);
        }

        let mut ids = Vec::with_capacity(batch.inserts.len());
        for data in batch.inserts {
            let id = DocumentId::generate();
            docs.push((id.clone(), data));
            ids.push(id);
        }
        Ok(BatchOutcome::Committed(ids))
    }
}

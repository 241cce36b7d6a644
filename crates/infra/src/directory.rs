//! People directory service over a [`DocumentStore`].
//!
//! Error policy:
//! - reads are fail-soft: `list_people` and `get_person` have no error channel;
//!   store failures are logged and degrade to an empty list / `None`
//! - writes return [`DirectoryError`], whose message is meant to be shown to the
//!   operator who attempted the change
//!
//! Every store call is bounded by a timeout, so a stalled backend surfaces as a
//! failure instead of hanging the request.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use chambers_core::Entity;
use chambers_people::{initial_people, sort_directory, NewPerson, Person, PersonId, PersonPatch};

use crate::document_store::{BatchOutcome, DocumentStore, Fields, StoreError, StoredDocument, WriteBatch};

/// Collection holding person documents unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "people";

/// Upper bound for a single store round-trip unless configured otherwise.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// What `seed_if_empty` did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The collection was empty and this many records were written.
    Seeded(usize),
    /// The collection already held records (possibly written by a concurrent seeder).
    AlreadyPopulated,
}

/// Write-path failure, carrying a human-readable message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Failed to add person: {0}")]
    Add(StoreError),

    #[error("Failed to update person: {0}")]
    Update(StoreError),

    #[error("Failed to delete person: {0}")]
    Delete(StoreError),

    #[error("Failed to seed people: {0}")]
    Seed(StoreError),
}

impl DirectoryError {
    pub fn store_error(&self) -> &StoreError {
        match self {
            DirectoryError::Add(e)
            | DirectoryError::Update(e)
            | DirectoryError::Delete(e)
            | DirectoryError::Seed(e) => e,
        }
    }
}

/// Durable storage and retrieval of person records.
///
/// Construct once with an injected store handle and share it; there is no
/// process-global client.
#[derive(Debug, Clone)]
pub struct DirectoryService<S> {
    store: S,
    collection: String,
    timeout: Duration,
}

impl<S> DirectoryService<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }

    /// Write the fixed seed set if, and only if, the collection is empty.
    ///
    /// Emptiness is re-checked atomically with the batch insert, so concurrent
    /// first callers write at most one seed batch.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn seed_if_empty(&self) -> Result<SeedOutcome, DirectoryError> {
        let existing = self
            .bounded(self.store.list(&self.collection, Some(1)))
            .await
            .map_err(DirectoryError::Seed)?;
        if !existing.is_empty() {
            return Ok(SeedOutcome::AlreadyPopulated);
        }

        tracing::info!("people collection is empty; seeding initial data");

        let inserts = initial_people()
            .iter()
            .map(|p| p.to_document())
            .collect::<Result<Vec<Fields>, _>>()
            .map_err(|e| DirectoryError::Seed(StoreError::InvalidDocument(e.to_string())))?;

        let outcome = self
            .bounded(
                self.store
                    .commit_batch(&self.collection, WriteBatch::if_collection_empty(inserts)),
            )
            .await
            .map_err(DirectoryError::Seed)?;

        match outcome {
            BatchOutcome::Committed(ids) => {
                tracing::info!(count = ids.len(), "initial data seeded");
                Ok(SeedOutcome::Seeded(ids.len()))
            }
            BatchOutcome::PreconditionFailed => {
                tracing::info!("collection populated concurrently; seed skipped");
                Ok(SeedOutcome::AlreadyPopulated)
            }
        }
    }

    /// Every person, leadership first, then by case-insensitive name.
    ///
    /// Seeds first. Any failure yields an empty list.
    pub async fn list_people(&self) -> Vec<Person> {
        if let Err(e) = self.seed_if_empty().await {
            tracing::error!(error = %e, "error fetching people");
            return Vec::new();
        }

        let documents = match self.bounded(self.store.list(&self.collection, None)).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::error!(error = %e, "error fetching people");
                return Vec::new();
            }
        };

        let mut people: Vec<Person> = documents.into_iter().filter_map(decode).collect();
        sort_directory(&mut people);
        people
    }

    /// The person with `id`, or `None` when missing or when the store fails.
    pub async fn get_person(&self, id: &PersonId) -> Option<Person> {
        match self.bounded(self.store.get(&self.collection, &id.0)).await {
            Ok(document) => document.and_then(decode),
            Err(e) => {
                tracing::error!(kind = Person::KIND, id = %id, error = %e, "error fetching person");
                None
            }
        }
    }

    /// Insert a new person; the store assigns the id.
    ///
    /// No field validation happens here.
    #[instrument(skip(self, person), fields(collection = %self.collection))]
    pub async fn add_person(&self, person: &NewPerson) -> Result<PersonId, DirectoryError> {
        let document = person
            .to_document()
            .map_err(|e| DirectoryError::Add(StoreError::InvalidDocument(e.to_string())))?;

        match self.bounded(self.store.add(&self.collection, document)).await {
            Ok(id) => Ok(PersonId::new(id)),
            Err(e) => {
                tracing::error!(kind = Person::KIND, error = %e, "error adding person");
                Err(DirectoryError::Add(e))
            }
        }
    }

    /// Merge `patch` into an existing person. Unmentioned fields are untouched.
    #[instrument(skip(self, id, patch), fields(collection = %self.collection, id = %id))]
    pub async fn update_person(&self, id: &PersonId, patch: &PersonPatch) -> Result<(), DirectoryError> {
        let fields = patch
            .to_fields()
            .map_err(|e| DirectoryError::Update(StoreError::InvalidDocument(e.to_string())))?;

        self.bounded(self.store.update(&self.collection, &id.0, fields))
            .await
            .map_err(|e| {
                tracing::error!(kind = Person::KIND, error = %e, "error updating person");
                DirectoryError::Update(e)
            })
    }

    /// Remove a person. Removing an unknown id succeeds.
    #[instrument(skip(self, id), fields(collection = %self.collection, id = %id))]
    pub async fn delete_person(&self, id: &PersonId) -> Result<(), DirectoryError> {
        self.bounded(self.store.delete(&self.collection, &id.0))
            .await
            .map_err(|e| {
                tracing::error!(kind = Person::KIND, error = %e, "error deleting person");
                DirectoryError::Delete(e)
            })
    }
}

fn decode(document: StoredDocument) -> Option<Person> {
    let id = PersonId::new(document.id);
    match Person::from_document(id.clone(), document.data) {
        Ok(person) => Some(person),
        Err(e) => {
            tracing::warn!(kind = Person::KIND, id = %id, error = %e, "skipping undecodable document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chambers_core::DocumentId;
    use chambers_people::PersonType;
    use serde_json::json;

    use super::*;
    use crate::document_store::InMemoryDocumentStore;

    /// A store whose every call fails.
    struct DownStore;

    #[async_trait]
    impl DocumentStore for DownStore {
        async fn list(&self, _: &str, _: Option<usize>) -> Result<Vec<StoredDocument>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn get(&self, _: &str, _: &DocumentId) -> Result<Option<StoredDocument>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn add(&self, _: &str, _: Fields) -> Result<DocumentId, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn update(&self, _: &str, _: &DocumentId, _: Fields) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn delete(&self, _: &str, _: &DocumentId) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn commit_batch(&self, _: &str, _: WriteBatch) -> Result<BatchOutcome, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    /// Wraps a store: delays reads and counts batch commits.
    struct SlowReads {
        inner: InMemoryDocumentStore,
        delay: Duration,
        batches: AtomicUsize,
    }

    impl SlowReads {
        fn new(delay: Duration) -> Self {
            Self {
                inner: InMemoryDocumentStore::new(),
                delay,
                batches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for SlowReads {
        async fn list(&self, c: &str, limit: Option<usize>) -> Result<Vec<StoredDocument>, StoreError> {
            tokio::time::sleep(self.delay).await;
            self.inner.list(c, limit).await
        }
        async fn get(&self, c: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError> {
            tokio::time::sleep(self.delay).await;
            self.inner.get(c, id).await
        }
        async fn add(&self, c: &str, data: Fields) -> Result<DocumentId, StoreError> {
            self.inner.add(c, data).await
        }
        async fn update(&self, c: &str, id: &DocumentId, fields: Fields) -> Result<(), StoreError> {
            self.inner.update(c, id, fields).await
        }
        async fn delete(&self, c: &str, id: &DocumentId) -> Result<(), StoreError> {
            self.inner.delete(c, id).await
        }
        async fn commit_batch(&self, c: &str, batch: WriteBatch) -> Result<BatchOutcome, StoreError> {
            let outcome = self.inner.commit_batch(c, batch).await?;
            if matches!(outcome, BatchOutcome::Committed(_)) {
                self.batches.fetch_add(1, Ordering::SeqCst);
            }
            Ok(outcome)
        }
    }

    fn service() -> DirectoryService<Arc<InMemoryDocumentStore>> {
        service_with_store().0
    }

    fn service_with_store() -> (DirectoryService<Arc<InMemoryDocumentStore>>, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        (DirectoryService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn empty_collection_lists_exactly_the_seed_set() {
        let svc = service();
        let people = svc.list_people().await;

        assert_eq!(people.len(), 6);
        let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Pradnya Talekar",
                "Satish Talekar",
                "Abhishek A. Deshpande",
                "Madhuri A. Bhadke",
                "Tejas D. Dande",
                "Vrushali U. Maindad",
            ]
        );
        assert!(people[..2].iter().all(|p| p.kind == PersonType::Leadership));
        assert!(people[2..].iter().all(|p| p.kind == PersonType::Associate));
    }

    #[tokio::test]
    async fn seeding_is_a_no_op_on_populated_collection() {
        let (svc, store) = service_with_store();
        let id = svc
            .add_person(&NewPerson::basic("Solo", "Clerk", PersonType::Associate))
            .await
            .unwrap();

        assert_eq!(svc.seed_if_empty().await.unwrap(), SeedOutcome::AlreadyPopulated);

        let people = svc.list_people().await;
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, id);
        assert_eq!(store.count(DEFAULT_COLLECTION), 1);
    }

    #[tokio::test]
    async fn seeding_twice_writes_once() {
        let (svc, store) = service_with_store();
        assert_eq!(svc.seed_if_empty().await.unwrap(), SeedOutcome::Seeded(6));
        assert_eq!(svc.seed_if_empty().await.unwrap(), SeedOutcome::AlreadyPopulated);
        assert_eq!(store.count(DEFAULT_COLLECTION), 6);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_cold_start_seeds_at_most_once() {
        // Both callers see an empty collection before either commits.
        let store = Arc::new(SlowReads::new(Duration::from_millis(50)));
        let a = DirectoryService::new(store.clone());
        let b = DirectoryService::new(store.clone());

        let (ra, rb) = tokio::join!(a.seed_if_empty(), b.seed_if_empty());
        let mut outcomes = vec![ra.unwrap(), rb.unwrap()];
        outcomes.sort_by_key(|o| matches!(o, SeedOutcome::AlreadyPopulated));

        assert_eq!(outcomes, vec![SeedOutcome::Seeded(6), SeedOutcome::AlreadyPopulated]);
        assert_eq!(store.batches.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.count(DEFAULT_COLLECTION), 6);
    }

    #[tokio::test]
    async fn add_then_get_round_trips() {
        let svc = service();
        let input = NewPerson::basic("A", "R", PersonType::Associate);

        let id = svc.add_person(&input).await.unwrap();
        let got = svc.get_person(&id).await.unwrap();

        assert_eq!(got, Person::from_parts(id, input));
    }

    #[tokio::test]
    async fn update_changes_only_named_fields() {
        let svc = service();
        svc.seed_if_empty().await.unwrap();
        let before = svc
            .list_people()
            .await
            .into_iter()
            .find(|p| p.name == "Satish Talekar")
            .unwrap();

        let patch = PersonPatch {
            role: Some("New Role".to_string()),
            ..Default::default()
        };
        svc.update_person(&before.id, &patch).await.unwrap();

        let after = svc.get_person(&before.id).await.unwrap();
        let expected = Person {
            role: "New Role".to_string(),
            ..before
        };
        assert_eq!(after, expected);
    }

    #[tokio::test]
    async fn updating_unknown_id_is_a_store_failure() {
        let svc = service();
        let id: PersonId = "nope".parse().unwrap();

        let err = svc
            .update_person(&id, &PersonPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err.store_error(), StoreError::NotFound { .. }));
        assert!(err.to_string().starts_with("Failed to update person: "));
    }

    #[tokio::test]
    async fn delete_twice_succeeds_and_record_is_gone() {
        let svc = service();
        let id = svc
            .add_person(&NewPerson::basic("Temp", "Associate", PersonType::Associate))
            .await
            .unwrap();

        svc.delete_person(&id).await.unwrap();
        svc.delete_person(&id).await.unwrap();
        assert_eq!(svc.get_person(&id).await, None);
    }

    #[tokio::test]
    async fn never_existing_id_is_not_found() {
        let svc = service();
        assert_eq!(svc.get_person(&"ghost".parse().unwrap()).await, None);
    }

    #[tokio::test]
    async fn failing_store_degrades_reads_and_reports_writes() {
        let svc = DirectoryService::new(DownStore);
        let id: PersonId = "any".parse().unwrap();

        assert!(svc.list_people().await.is_empty());
        assert_eq!(svc.get_person(&id).await, None);

        let add = svc
            .add_person(&NewPerson::basic("A", "R", PersonType::Associate))
            .await
            .unwrap_err();
        assert_eq!(
            add.to_string(),
            "Failed to add person: store unavailable: connection refused"
        );

        let update = svc.update_person(&id, &PersonPatch::default()).await.unwrap_err();
        assert!(matches!(update, DirectoryError::Update(StoreError::Unavailable(_))));

        let delete = svc.delete_person(&id).await.unwrap_err();
        assert!(delete.to_string().starts_with("Failed to delete person: "));
    }

    #[tokio::test]
    async fn stalled_store_times_out_like_a_failure() {
        let store = Arc::new(SlowReads::new(Duration::from_millis(200)));
        let svc = DirectoryService::new(store.clone()).with_timeout(Duration::from_millis(20));

        assert!(svc.list_people().await.is_empty());
        assert_eq!(svc.get_person(&"x".parse().unwrap()).await, None);
        assert!(matches!(
            svc.seed_if_empty().await,
            Err(DirectoryError::Seed(StoreError::Timeout(_)))
        ));
    }

    #[tokio::test]
    async fn undecodable_documents_are_skipped() {
        let (svc, store) = service_with_store();
        svc.seed_if_empty().await.unwrap();

        let bad = match json!({ "name": "X", "role": "Y", "type": "intern" }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let bad_id = store.add(DEFAULT_COLLECTION, bad).await.unwrap();

        assert_eq!(svc.list_people().await.len(), 6);
        assert_eq!(svc.get_person(&PersonId::new(bad_id)).await, None);
    }

    #[tokio::test]
    async fn custom_collection_is_isolated() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let svc = DirectoryService::new(store.clone()).with_collection("staff");

        assert_eq!(svc.list_people().await.len(), 6);
        assert_eq!(store.count("staff"), 6);
        assert_eq!(store.count(DEFAULT_COLLECTION), 0);
    }
}

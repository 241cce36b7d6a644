//! Schemaless document store boundary.
//!
//! Collections of JSON documents addressed by store-assigned ids, with merge
//! updates, idempotent deletes and a conditional batch insert. No storage
//! assumptions leak out of this module.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresDocumentStore;
pub use r#trait::{
    BatchOutcome, BatchPrecondition, DocumentStore, Fields, StoreError, StoredDocument, WriteBatch,
};

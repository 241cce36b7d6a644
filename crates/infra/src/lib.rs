//! Infrastructure layer: document storage, the directory service, configuration.

pub mod config;
pub mod directory;
pub mod document_store;

pub use config::{AppConfig, ConfigError};
pub use directory::{DirectoryError, DirectoryService, SeedOutcome};
pub use document_store::{DocumentStore, InMemoryDocumentStore, StoreError};

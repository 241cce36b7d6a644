use std::sync::Arc;

use chambers_auth::{AuthGate, Hs256SessionVerifier, RevocationList, SessionVerifier};
use chambers_infra::{AppConfig, DirectoryService, DocumentStore, InMemoryDocumentStore, SeedOutcome};

pub type SharedStore = Arc<dyn DocumentStore>;
pub type SharedGate = AuthGate<Arc<dyn SessionVerifier>>;

/// Everything the handlers need, constructed once at startup.
pub struct AppServices {
    pub directory: DirectoryService<SharedStore>,
    pub gate: Arc<SharedGate>,
    pub revocations: Arc<RevocationList>,
}

impl AppServices {
    pub fn new(store: SharedStore, config: &AppConfig) -> Self {
        let revocations = Arc::new(RevocationList::new());
        let verifier: Arc<dyn SessionVerifier> = Arc::new(Hs256SessionVerifier::new(
            config.session_secret.as_bytes(),
            revocations.clone(),
        ));

        let directory = DirectoryService::new(store)
            .with_collection(config.people_collection.clone())
            .with_timeout(config.store_timeout);

        Self {
            directory,
            gate: Arc::new(AuthGate::new(verifier, config.admins.clone())),
            revocations,
        }
    }
}

/// Wire services for the configured store backend and seed the directory.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let services = AppServices::new(connect_store(config).await?, config);

    match services.directory.seed_if_empty().await {
        Ok(SeedOutcome::Seeded(count)) => tracing::info!(count, "directory seeded"),
        Ok(SeedOutcome::AlreadyPopulated) => tracing::debug!("directory already populated"),
        // Reads stay fail-soft, so the service still starts.
        Err(e) => tracing::error!(error = %e, "directory seeding failed"),
    }

    Ok(services)
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    match config.database_url.as_deref() {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let store = chambers_infra::document_store::PostgresDocumentStore::connect(url).await?;
            store.ensure_schema().await?;
            tracing::info!("using postgres document store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            tracing::warn!("DATABASE_URL is set but postgres support is not compiled in; using in-memory store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        None => {
            tracing::info!("using in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

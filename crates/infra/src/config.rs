//! Configuration loading and representation.
//!
//! Read once from the environment at startup; immutable afterwards.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use chambers_auth::AdminAllowList;

use crate::directory::{DEFAULT_COLLECTION, DEFAULT_STORE_TIMEOUT};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_SESSION_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Process configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub session_secret: String,
    pub admins: AdminAllowList,
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    pub store_timeout: Duration,
    pub people_collection: String,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("session_secret", &"<redacted>")
            .field("admins", &self.admins.len())
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("store_timeout", &self.store_timeout)
            .field("people_collection", &self.people_collection)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                message: e.to_string(),
            })?;

        let session_secret = var("SESSION_SECRET").unwrap_or_else(|| {
            tracing::warn!("SESSION_SECRET not set; using insecure dev default");
            DEV_SESSION_SECRET.to_string()
        });

        let admins = AdminAllowList::parse(&var("ADMIN_EMAILS").unwrap_or_default());
        if admins.is_empty() {
            tracing::warn!("ADMIN_EMAILS is empty; directory mutations are disabled");
        }

        let store_timeout = match var("STORE_TIMEOUT_MS") {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: "STORE_TIMEOUT_MS",
                    message: e.to_string(),
                })?;
                if ms == 0 {
                    return Err(ConfigError::Invalid {
                        var: "STORE_TIMEOUT_MS",
                        message: "must be greater than zero".to_string(),
                    });
                }
                Duration::from_millis(ms)
            }
            None => DEFAULT_STORE_TIMEOUT,
        };

        Ok(Self {
            bind_addr,
            session_secret,
            admins,
            database_url: var("DATABASE_URL"),
            store_timeout,
            people_collection: var("PEOPLE_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        })
    }
}

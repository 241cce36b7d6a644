//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store backend selection, auth gate, startup seeding
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response shapes and input validation
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use chambers_infra::AppConfig;

use crate::middleware::AuthState;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config).await?;
    Ok(router(Arc::new(services)))
}

/// Router over already-constructed services.
pub fn router(services: Arc<AppServices>) -> Router {
    let auth_state = AuthState {
        gate: services.gate.clone(),
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router(auth_state))
        .layer(Extension(services))
}

pub use services::AppServices;

use axum::Router;

use crate::middleware::AuthState;

pub mod contact;
pub mod people;
pub mod session;
pub mod system;

pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .merge(people::router(auth_state))
        .merge(session::router())
        .merge(contact::router())
}

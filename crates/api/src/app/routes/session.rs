use std::sync::Arc;

use axum::{
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;

use chambers_auth::SESSION_COOKIE;

use crate::app::dto::{SessionResponse, WriteOutcome};
use crate::app::errors::json_error;
use crate::app::services::AppServices;
use crate::middleware::session_token;

pub fn router() -> Router {
    Router::new()
        .route("/session", get(current_session))
        .route("/session/logout", post(logout))
}

async fn current_session(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let token = session_token(&headers);
    let claims = services.gate.get_authenticated_user(&token.as_deref()).await;

    Json(match claims {
        Some(claims) => SessionResponse {
            authenticated: true,
            admin: services.gate.is_user_admin(claims.email.as_deref()),
            email: claims.email,
        },
        None => SessionResponse {
            authenticated: false,
            email: None,
            admin: false,
        },
    })
}

/// Revoke every session of the caller and clear the cookie.
///
/// Succeeds without a session, so a stale cookie can always be dropped. The
/// cookie is cleared even when the revocation could not be recorded.
async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    let token = session_token(&headers);
    let mut recorded = true;
    if let Some(claims) = services.gate.get_authenticated_user(&token.as_deref()).await {
        recorded = services.revocations.revoke_user(&claims.uid, Utc::now());
        if recorded {
            tracing::info!(uid = %claims.uid, "sessions revoked");
        } else {
            tracing::error!(uid = %claims.uid, "failed to record session revocation");
        }
    }

    logout_response(recorded)
}

fn logout_response(recorded: bool) -> Response {
    let clear = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    let body = if recorded {
        Json(WriteOutcome::ok()).into_response()
    } else {
        json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "revocation_failed",
            "sessions could not be revoked",
        )
    };
    ([(SET_COOKIE, clear)], body).into_response()
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::COOKIE, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use chambers_auth::{cookie_value, SessionTokenSource, SESSION_COOKIE};

use crate::app::errors::json_error;
use crate::app::services::SharedGate;
use crate::context::AdminContext;

#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<SharedGate>,
}

/// Session token carried in the request's `Cookie` header(s).
pub struct RequestCookies<'a>(pub &'a HeaderMap);

impl SessionTokenSource for RequestCookies<'_> {
    fn session_token(&self) -> Option<&str> {
        self.0
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|header| cookie_value(header, SESSION_COOKIE))
    }
}

/// Owned copy of the request's session token, so no header borrow is held
/// across the verifier call.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    RequestCookies(headers).session_token().map(str::to_owned)
}

/// Admits only allow-listed identities.
///
/// 401 without a verified session, 403 for a verified non-admin. On success an
/// [`AdminContext`] is inserted into the request extensions.
pub async fn require_admin(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = session_token(req.headers());

    let claims = state
        .gate
        .get_authenticated_user(&token.as_deref())
        .await
        .ok_or_else(|| json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "sign in required"))?;

    if !state.gate.is_user_admin(claims.email.as_deref()) {
        tracing::warn!(uid = %claims.uid, "non-admin attempted a directory change");
        return Err(json_error(StatusCode::FORBIDDEN, "forbidden", "admin access required"));
    }

    let admin = AdminContext::from_claims(&claims)
        .ok_or_else(|| json_error(StatusCode::FORBIDDEN, "forbidden", "admin access required"))?;
    req.extensions_mut().insert(admin);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn finds_session_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("lang=en; session=abc.def.ghi"));

        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_empty_cookie_is_no_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("session="));
        assert_eq!(session_token(&headers), None);
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::claims::SessionClaims;

/// Why a session token was not accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("malformed session token: {0}")]
    Malformed(String),

    #[error("session token signature is invalid")]
    InvalidSignature,

    #[error("session token has expired")]
    Expired,

    #[error("session token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("session has been revoked")]
    Revoked,
}

/// Identity-provider boundary: turns a raw session cookie into verified claims.
///
/// With `check_revoked` set, implementations must also reject sessions that were
/// explicitly revoked, not only expired ones.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify_session_cookie(
        &self,
        token: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, VerificationError>;
}

#[async_trait]
impl<V> SessionVerifier for Arc<V>
where
    V: SessionVerifier + ?Sized,
{
    async fn verify_session_cookie(
        &self,
        token: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, VerificationError> {
        (**self).verify_session_cookie(token, check_revoked).await
    }
}

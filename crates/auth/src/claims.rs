use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verifier::VerificationError;

/// Verified session identity (transport-agnostic).
///
/// This is what the gate hands back once a session token has been decoded,
/// checked and found unrevoked. It lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject / user identifier at the identity provider.
    pub uid: String,

    /// Email address of the signed-in user, when the provider knows one.
    pub email: Option<String>,

    /// Provider-side session identifier, if any.
    pub session_id: Option<String>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Deterministically validate the time window of session claims.
///
/// Note: this validates the *claims* only. Signature checks happen in the
/// verifier before this is called.
pub fn validate_claims(claims: &SessionClaims, now: DateTime<Utc>) -> Result<(), VerificationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(VerificationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(VerificationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(VerificationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(issued_at: DateTime<Utc>, ttl: Duration) -> SessionClaims {
        SessionClaims {
            uid: "u1".to_string(),
            email: Some("admin@example.com".to_string()),
            session_id: None,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn accepts_token_inside_window() {
        let now = Utc::now();
        let c = claims(now - Duration::minutes(1), Duration::hours(1));
        assert_eq!(validate_claims(&c, now), Ok(()));
    }

    #[test]
    fn rejects_expired_and_future_tokens() {
        let now = Utc::now();
        let expired = claims(now - Duration::hours(2), Duration::hours(1));
        assert_eq!(validate_claims(&expired, now), Err(VerificationError::Expired));

        let future = claims(now + Duration::minutes(5), Duration::hours(1));
        assert_eq!(validate_claims(&future, now), Err(VerificationError::NotYetValid));
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        let c = claims(now, Duration::zero());
        assert_eq!(validate_claims(&c, now), Err(VerificationError::InvalidTimeWindow));
    }
}

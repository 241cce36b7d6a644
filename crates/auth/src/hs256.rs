//! HS256 session-cookie identity provider.
//!
//! Session cookies are compact JWTs signed with a shared secret. Signature and
//! structure are checked by `jsonwebtoken`; the time window is checked by
//! [`validate_claims`] so expiry surfaces as a typed error.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::claims::{SessionClaims, validate_claims};
use crate::revocation::RevocationList;
use crate::verifier::{SessionVerifier, VerificationError};

/// Wire claims of a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl SessionTokenClaims {
    fn into_session_claims(self) -> Result<SessionClaims, VerificationError> {
        Ok(SessionClaims {
            uid: self.sub,
            email: self.email,
            session_id: self.sid,
            issued_at: timestamp(self.iat, "iat")?,
            expires_at: timestamp(self.exp, "exp")?,
        })
    }
}

fn timestamp(secs: i64, claim: &str) -> Result<DateTime<Utc>, VerificationError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| VerificationError::Malformed(format!("{claim} out of range")))
}

/// Shared-secret session verifier with revocation support.
pub struct Hs256SessionVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    revocations: Arc<RevocationList>,
}

impl Hs256SessionVerifier {
    pub fn new(secret: &[u8], revocations: Arc<RevocationList>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            revocations,
        }
    }

    /// Sign a new session cookie value.
    pub fn issue(&self, claims: &SessionTokenClaims) -> Result<String, VerificationError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| VerificationError::Malformed(e.to_string()))
    }

    /// Verify against an explicit clock.
    pub fn verify_at(
        &self,
        token: &str,
        check_revoked: bool,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, VerificationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time window is checked below with typed errors.
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<SessionTokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
                _ => VerificationError::Malformed(e.to_string()),
            })?;

        let claims = data.claims.into_session_claims()?;
        validate_claims(&claims, now)?;

        if check_revoked && self.revocations.is_revoked(&claims) {
            return Err(VerificationError::Revoked);
        }

        Ok(claims)
    }
}

#[async_trait]
impl SessionVerifier for Hs256SessionVerifier {
    async fn verify_session_cookie(
        &self,
        token: &str,
        check_revoked: bool,
    ) -> Result<SessionClaims, VerificationError> {
        self.verify_at(token, check_revoked, Utc::now())
    }
}

//! Session auth gate: session token -> verified identity -> privilege decision.
//!
//! The gate never raises on a bad token. Verification failures are logged and
//! collapse into "no identity". Enforcement (what a route does with the answer)
//! belongs to the caller.

use crate::admins::AdminAllowList;
use crate::claims::SessionClaims;
use crate::cookie::SessionTokenSource;
use crate::verifier::SessionVerifier;

/// Composes an identity provider with the admin allow-list.
///
/// Construct once at startup and share (e.g. behind an `Arc`).
pub struct AuthGate<V> {
    verifier: V,
    admins: AdminAllowList,
}

impl<V> AuthGate<V>
where
    V: SessionVerifier,
{
    pub fn new(verifier: V, admins: AdminAllowList) -> Self {
        Self { verifier, admins }
    }

    /// Resolve the caller's session into verified claims.
    ///
    /// Revocation checking is always requested.
    pub async fn get_authenticated_user<S>(&self, source: &S) -> Option<SessionClaims>
    where
        S: SessionTokenSource + ?Sized,
    {
        let token = source.session_token()?;

        match self.verifier.verify_session_cookie(token, true).await {
            Ok(claims) => {
                tracing::debug!(uid = %claims.uid, "session verified");
                Some(claims)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session cookie verification failed");
                None
            }
        }
    }

    /// Case-insensitive allow-list check. False for absent/empty input.
    pub fn is_user_admin(&self, email: Option<&str>) -> bool {
        self.admins.is_admin(email)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::cookie::CookieHeader;
    use crate::hs256::{Hs256SessionVerifier, SessionTokenClaims};
    use crate::revocation::RevocationList;

    struct Fixture {
        gate: AuthGate<Arc<Hs256SessionVerifier>>,
        verifier: Arc<Hs256SessionVerifier>,
        revocations: Arc<RevocationList>,
    }

    fn fixture() -> Fixture {
        let revocations = Arc::new(RevocationList::new());
        let verifier = Arc::new(Hs256SessionVerifier::new(b"gate-secret", revocations.clone()));
        Fixture {
            gate: AuthGate::new(verifier.clone(), AdminAllowList::new(["admin@example.com"])),
            verifier,
            revocations,
        }
    }

    fn mint(fx: &Fixture, email: &str, ttl: Duration) -> String {
        let now = Utc::now() - Duration::seconds(5);
        fx.verifier
            .issue(&SessionTokenClaims {
                sub: format!("uid-{email}"),
                email: Some(email.to_string()),
                sid: None,
                iat: now.timestamp(),
                exp: (now + ttl).timestamp(),
            })
            .unwrap()
    }

    #[tokio::test]
    async fn no_cookie_means_no_identity() {
        let fx = fixture();
        let gate = &fx.gate;
        assert_eq!(gate.get_authenticated_user(&CookieHeader("theme=dark")).await, None);
        assert_eq!(gate.get_authenticated_user(&None::<&str>).await, None);
    }

    #[tokio::test]
    async fn valid_cookie_yields_identity_and_admin_decision() {
        let fx = fixture();
        let gate = &fx.gate;
        let token = mint(&fx, "Admin@Example.com", Duration::hours(1));
        let header = format!("session={token}");

        let claims = gate
            .get_authenticated_user(&CookieHeader(&header))
            .await
            .expect("identity");
        assert!(gate.is_user_admin(claims.email.as_deref()));
    }

    #[tokio::test]
    async fn non_admin_identity_is_not_privileged() {
        let fx = fixture();
        let gate = &fx.gate;
        let token = mint(&fx, "visitor@example.com", Duration::hours(1));

        let claims = gate
            .get_authenticated_user(&Some(token.as_str()))
            .await
            .expect("identity");
        assert!(!gate.is_user_admin(claims.email.as_deref()));
    }

    #[tokio::test]
    async fn invalid_expired_and_revoked_tokens_degrade_to_none() {
        let fx = fixture();
        let gate = &fx.gate;

        assert_eq!(gate.get_authenticated_user(&Some("garbage")).await, None);

        let expired = mint(&fx, "admin@example.com", Duration::seconds(1));
        assert_eq!(gate.get_authenticated_user(&Some(expired.as_str())).await, None);

        let live = mint(&fx, "admin@example.com", Duration::hours(1));
        assert!(fx.revocations.revoke_user("uid-admin@example.com", Utc::now()));
        assert_eq!(gate.get_authenticated_user(&Some(live.as_str())).await, None);
    }
}

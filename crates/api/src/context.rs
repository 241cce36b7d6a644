use chambers_auth::SessionClaims;

/// Verified administrator behind the current request.
///
/// Inserted by the admin guard; only present on routes behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    uid: String,
    email: String,
}

impl AdminContext {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }

    /// Build from claims that already passed the allow-list check.
    pub fn from_claims(claims: &SessionClaims) -> Option<Self> {
        let email = claims.email.as_deref()?;
        Some(Self::new(claims.uid.as_str(), email))
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

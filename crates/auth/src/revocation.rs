use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::claims::SessionClaims;

/// Per-user revocation marks.
///
/// Revoking a user invalidates every session issued at or before the
/// revocation second. `iat` carries whole seconds only, so a session issued
/// later within that same second is rejected too; it verifies again from the
/// next second on.
#[derive(Debug, Default)]
pub struct RevocationList {
    revoked_through: RwLock<HashMap<String, i64>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke all sessions of `uid` issued up to `at`.
    ///
    /// Returns `false` when the mark could not be recorded (poisoned lock).
    #[must_use]
    pub fn revoke_user(&self, uid: &str, at: DateTime<Utc>) -> bool {
        let Ok(mut map) = self.revoked_through.write() else {
            return false;
        };
        let mark = map.entry(uid.to_string()).or_insert(i64::MIN);
        *mark = (*mark).max(at.timestamp());
        true
    }

    pub fn is_revoked(&self, claims: &SessionClaims) -> bool {
        let map = match self.revoked_through.read() {
            Ok(m) => m,
            // A poisoned lock means we cannot prove the session is live.
            Err(_) => return true,
        };

        map.get(&claims.uid)
            .is_some_and(|through| claims.issued_at.timestamp() <= *through)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims(uid: &str, issued_at: DateTime<Utc>) -> SessionClaims {
        SessionClaims {
            uid: uid.to_string(),
            email: None,
            session_id: None,
            issued_at,
            expires_at: issued_at + Duration::hours(1),
        }
    }

    #[test]
    fn revocation_applies_to_earlier_sessions_of_that_user_only() {
        let list = RevocationList::new();
        let now = Utc::now();
        let old = claims("u1", now - Duration::minutes(10));
        let other = claims("u2", now - Duration::minutes(10));

        assert!(list.revoke_user("u1", now));

        assert!(list.is_revoked(&old));
        assert!(!list.is_revoked(&other));
        assert!(!list.is_revoked(&claims("u1", now + Duration::seconds(1))));
    }

    #[test]
    fn session_issued_earlier_in_the_revocation_second_is_rejected() {
        let list = RevocationList::new();
        let issued = Utc.timestamp_millis_opt(1_700_000_000_100).unwrap();
        let revoked = Utc.timestamp_millis_opt(1_700_000_000_900).unwrap();

        assert!(list.revoke_user("u1", revoked));

        assert!(list.is_revoked(&claims("u1", issued)));
        assert!(list.is_revoked(&claims("u1", revoked)));
        assert!(!list.is_revoked(&claims(
            "u1",
            Utc.timestamp_opt(1_700_000_001, 0).unwrap()
        )));
    }

    #[test]
    fn later_revocation_wins() {
        let list = RevocationList::new();
        let now = Utc::now();
        assert!(list.revoke_user("u1", now));
        assert!(list.revoke_user("u1", now - Duration::hours(1)));

        assert!(list.is_revoked(&claims("u1", now - Duration::minutes(1))));
    }

    #[test]
    fn poisoned_list_reports_failure_and_fails_closed() {
        let list = Arc::new(RevocationList::new());
        let poisoner = list.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.revoked_through.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(!list.revoke_user("u1", Utc::now()));
        assert!(list.is_revoked(&claims("u2", Utc::now())));
    }
}

use std::collections::HashSet;

/// Statically configured set of privileged email addresses.
///
/// Entries are normalized (trimmed, lowercased) on construction so lookups are
/// case-insensitive. Pure data: no IO, no failure mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        emails.into_iter().collect()
    }

    /// Parse a comma-separated list (e.g. the `ADMIN_EMAILS` variable).
    pub fn parse(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    /// Case-insensitive membership test. Absent or empty input is never an admin.
    pub fn is_admin(&self, email: Option<&str>) -> bool {
        match email {
            Some(email) if !email.is_empty() => self.emails.contains(&email.to_lowercase()),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AdminAllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let emails = iter
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_ignores_case() {
        let admins = AdminAllowList::new(["name@example.com"]);
        assert!(admins.is_admin(Some("Name@Example.com")));
        assert_eq!(
            admins.is_admin(Some("Name@Example.com")),
            admins.is_admin(Some("name@example.com"))
        );
        assert!(!admins.is_admin(Some("other@example.com")));
    }

    #[test]
    fn absent_and_empty_are_never_admin() {
        let admins = AdminAllowList::new(["name@example.com"]);
        assert!(!admins.is_admin(None));
        assert!(!admins.is_admin(Some("")));
    }

    #[test]
    fn parse_trims_and_drops_blank_entries() {
        let admins = AdminAllowList::parse(" A@x.com , ,b@Y.org,");
        assert_eq!(admins.len(), 2);
        assert!(admins.is_admin(Some("a@x.com")));
        assert!(admins.is_admin(Some("B@y.ORG")));
        assert!(AdminAllowList::parse("").is_empty());
    }
}

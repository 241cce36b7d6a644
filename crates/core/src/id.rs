//! Store-assigned document identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque identifier of a document in a collection.
///
/// Identifiers are assigned by the store on insert. Callers treat them as opaque
/// strings: they are compared, displayed and passed back, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh identifier.
    ///
    /// Uses the simple (hyphenless) form of a UUIDv7, so ids are URL-safe and
    /// roughly insertion-ordered.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::invalid_id("DocumentId: empty"));
        }
        if s.contains('/') {
            return Err(DomainError::invalid_id(format!(
                "DocumentId: '{s}' contains a path separator"
            )));
        }
        Ok(Self(s.to_string()))
    }
}

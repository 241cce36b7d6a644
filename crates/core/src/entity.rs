//! Entity trait: records that keep their identity across partial updates.

/// A persisted record addressed by a stable identifier.
pub trait Entity {
    /// Strongly-typed identifier (assigned once, never changed).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Short lowercase name used in log fields and failure messages (e.g. "person").
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

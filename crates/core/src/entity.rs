//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Records handed back by the persistence collaborators are entities: two
/// records with the same id describe the same invoice, item or client even when
/// their fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

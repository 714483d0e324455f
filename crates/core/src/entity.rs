//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Host records (products, users, orders) are entities: the host platform owns
/// their lifecycle, this workspace only reads them by identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

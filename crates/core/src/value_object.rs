//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two
/// `DiscountFraction`s holding `0.10` are the same discount, while two users
/// with the same roles are still different users (entities).
///
/// ```ignore
/// let a = DiscountFraction::from_percent(10)?;
/// let b = DiscountFraction::new(Decimal::new(10, 2))?;
/// assert_eq!(a, b);  // Equal by value, not identity
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

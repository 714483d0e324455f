//! Error model shared by the rules and the store boundary.

use thiserror::Error;

/// Result type used across the rules layer.
pub type RuleResult<T> = Result<T, RuleError>;

/// Failure reported by an external store (the host platform's data access).
///
/// Stores are treated as synchronous calls that may fail; the rules never retry,
/// they log and move on to the next unit of work.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or did not answer.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused a write (duplicate key, validation, permissions).
    #[error("store rejected write: {0}")]
    Rejected(String),

    /// An in-process store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Kind of host record a [`RuleError::NotFound`] refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Order,
    Product,
    User,
    Tag,
    Role,
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            EntityKind::Order => "order",
            EntityKind::Product => "product",
            EntityKind::User => "user",
            EntityKind::Tag => "tag",
            EntityKind::Role => "role",
        })
    }
}

/// Rules-level error.
///
/// None of these are fatal to the host: callers log them and skip the affected
/// unit of work (an order line, a cart line, a provisioning step).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A referenced host record does not exist (deleted product, unknown user).
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// The host store failed while reading or writing.
    #[error("external store error: {0}")]
    ExternalStore(#[from] StoreError),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Configuration values failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RuleError {
    pub fn not_found(kind: EntityKind, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `NotFound` is expected churn (deleted records); everything else is a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RuleError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_renders_kind_and_id() {
        let err = RuleError::not_found(EntityKind::Product, 17);
        assert_eq!(err.to_string(), "product not found: 17");
        assert!(err.is_not_found());
    }

    #[test]
    fn store_errors_convert_into_rule_errors() {
        let err: RuleError = StoreError::rejected("duplicate slug").into();
        assert_eq!(
            err,
            RuleError::ExternalStore(StoreError::Rejected("duplicate slug".to_string()))
        );
        assert!(!err.is_not_found());
    }
}

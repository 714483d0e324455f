//! Outcome of an idempotent "ensure this exists" call against a host store.

use serde::{Deserialize, Serialize};

/// What an ensure call did.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provisioned {
    /// The resource was missing and has been inserted.
    Created,
    /// The resource was already present; nothing was written.
    AlreadyExists,
}

impl core::fmt::Display for Provisioned {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Provisioned::Created => write!(f, "created"),
            Provisioned::AlreadyExists => write!(f, "already exists"),
        }
    }
}

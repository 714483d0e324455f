use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Capability identifier (e.g. "read", "edit_posts").
///
/// Capabilities are opaque strings owned by the host; this workspace only ever
/// grants the plain `read` capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(Cow<'static, str>);

impl Capability {
    pub const READ: Capability = Capability(Cow::Borrowed("read"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability grants attached to a role (`{read: true}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeMap<Capability, bool>);

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// The capability set members receive: read access only.
    pub fn read_only() -> Self {
        Self::new().with(Capability::READ, true)
    }

    pub fn with(mut self, capability: Capability, granted: bool) -> Self {
        self.0.insert(capability, granted);
        self
    }

    pub fn allows(&self, capability: &Capability) -> bool {
        self.0.get(capability).copied().unwrap_or(false)
    }
}

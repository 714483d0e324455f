use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use coopmember_core::{Provisioned, RuleResult, StoreError};

use crate::Capabilities;

/// Role identifier (e.g. "coop_member").
///
/// Roles are intentionally opaque strings at this layer; mapping roles to
/// capabilities is the host's job, seeded through [`RoleDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A role as registered with the host: id, label, capability grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub display_name: String,
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl RoleDefinition {
    pub fn new(role: Role, display_name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            role,
            display_name: display_name.into(),
            capabilities,
        }
    }
}

/// Host role registry.
pub trait RoleStore: Send + Sync {
    fn exists(&self, role: &Role) -> Result<bool, StoreError>;

    fn create(&self, definition: RoleDefinition) -> Result<(), StoreError>;
}

/// Register `definition` with the host unless a role with that id exists.
///
/// Idempotent: a second call reports [`Provisioned::AlreadyExists`] and writes
/// nothing. An existing role is left as-is even if its label or capabilities
/// differ (the host's administrators may have edited it).
pub fn ensure_role(store: &dyn RoleStore, definition: &RoleDefinition) -> RuleResult<Provisioned> {
    if store.exists(&definition.role)? {
        tracing::info!(role = %definition.role, "role already exists");
        return Ok(Provisioned::AlreadyExists);
    }

    store.create(definition.clone())?;
    tracing::info!(
        role = %definition.role,
        display_name = %definition.display_name,
        "created role"
    );
    Ok(Provisioned::Created)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use coopmember_core::RuleError;

    use super::*;

    #[derive(Default)]
    struct Registry {
        roles: Mutex<BTreeMap<Role, RoleDefinition>>,
        reject_writes: bool,
    }

    impl RoleStore for Registry {
        fn exists(&self, role: &Role) -> Result<bool, StoreError> {
            Ok(self.roles.lock().unwrap().contains_key(role))
        }

        fn create(&self, definition: RoleDefinition) -> Result<(), StoreError> {
            if self.reject_writes {
                return Err(StoreError::rejected("read-only registry"));
            }
            self.roles
                .lock()
                .unwrap()
                .insert(definition.role.clone(), definition);
            Ok(())
        }
    }

    fn member_role() -> RoleDefinition {
        RoleDefinition::new(Role::new("coop_member"), "Coop Member", Capabilities::read_only())
    }

    #[test]
    fn ensure_role_creates_then_reports_existing() {
        let registry = Registry::default();

        assert_eq!(ensure_role(&registry, &member_role()), Ok(Provisioned::Created));
        assert_eq!(ensure_role(&registry, &member_role()), Ok(Provisioned::AlreadyExists));

        let roles = registry.roles.lock().unwrap();
        assert_eq!(roles.len(), 1);
        let stored = &roles[&Role::new("coop_member")];
        assert_eq!(stored.display_name, "Coop Member");
        assert!(stored.capabilities.allows(&crate::Capability::READ));
    }

    #[test]
    fn ensure_role_surfaces_store_rejection() {
        let registry = Registry {
            reject_writes: true,
            ..Registry::default()
        };

        let err = ensure_role(&registry, &member_role()).unwrap_err();
        assert!(matches!(err, RuleError::ExternalStore(StoreError::Rejected(_))));
    }
}

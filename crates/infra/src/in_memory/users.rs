use std::collections::BTreeMap;
use std::sync::RwLock;

use coopmember_auth::{Role, RoleDefinition, RoleStore, User, UserStore};
use coopmember_core::{StoreError, UserId};

use super::{FailureInjector, InMemoryTable};

/// In-memory user accounts and role registry.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: InMemoryTable<User>,
    roles: RwLock<BTreeMap<Role, RoleDefinition>>,
    failures: FailureInjector,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.users.upsert(user)
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).ok().flatten()
    }

    pub fn role(&self, role: &Role) -> Option<RoleDefinition> {
        self.roles.read().ok()?.get(role).cloned()
    }

    pub fn failures(&self) -> &FailureInjector {
        &self.failures
    }
}

impl UserStore for InMemoryUserDirectory {
    fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.failures.check_read()?;
        self.users.get(&id)
    }

    fn add_role(&self, id: UserId, role: Role) -> Result<(), StoreError> {
        self.failures.check_write()?;
        let found = self.users.update(&id, |user| {
            user.add_role(role);
        })?;
        if !found {
            return Err(StoreError::rejected(format!("no user with id {id}")));
        }
        Ok(())
    }
}

impl RoleStore for InMemoryUserDirectory {
    fn exists(&self, role: &Role) -> Result<bool, StoreError> {
        self.failures.check_read()?;
        let roles = self.roles.read().map_err(|_| StoreError::Poisoned)?;
        Ok(roles.contains_key(role))
    }

    fn create(&self, definition: RoleDefinition) -> Result<(), StoreError> {
        self.failures.check_write()?;
        let mut roles = self.roles.write().map_err(|_| StoreError::Poisoned)?;
        if roles.contains_key(&definition.role) {
            return Err(StoreError::rejected(format!(
                "role '{}' already exists",
                definition.role
            )));
        }
        roles.insert(definition.role.clone(), definition);
        Ok(())
    }
}

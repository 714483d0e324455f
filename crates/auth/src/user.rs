//! Host user accounts as seen by the membership rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use coopmember_core::{Entity, StoreError, UserId};

use crate::Role;

/// A host user and the roles currently assigned to them.
///
/// # Invariants
/// - Roles are a set: assigning a role the user already holds changes nothing.
/// - Nothing in this workspace removes roles; revocation is an administrative
///   action taken in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    roles: BTreeSet<Role>,
}

impl User {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Add `role`; returns `false` when it was already held.
    pub fn add_role(&mut self, role: Role) -> bool {
        self.roles.insert(role)
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Host user storage.
pub trait UserStore: Send + Sync {
    fn get(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Add `role` to the user's role set. Adding a held role must be a no-op.
    fn add_role(&self, id: UserId, role: Role) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Role {
        Role::new("coop_member")
    }

    #[test]
    fn add_role_reports_whether_it_changed_anything() {
        let mut user = User::new(UserId::new(7), "Ada");
        assert!(user.add_role(member()));
        assert!(!user.add_role(member()));
        assert_eq!(user.roles().len(), 1);
        assert!(user.has_role(&member()));
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(user.id_typed(), UserId::new(7));
        assert!(user.roles().is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: adding a role is a monotonic union (prior roles survive, cardinality grows by at most one).
            #[test]
            fn add_role_is_monotonic(
                prior in proptest::collection::btree_set("[a-z_]{1,12}", 0..8)
            ) {
                let mut user = User::new(UserId::new(1), "prop");
                for name in &prior {
                    user.add_role(Role::new(name.clone()));
                }
                let before = user.roles().clone();

                user.add_role(member());
                user.add_role(member());

                prop_assert!(user.roles().is_superset(&before));
                prop_assert!(user.has_role(&member()));
                prop_assert!(user.roles().len() <= before.len() + 1);
            }
        }
    }
}

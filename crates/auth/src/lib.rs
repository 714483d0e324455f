//! `coopmember-auth`: users, roles and capabilities as the host exposes them.
//!
//! This crate is intentionally decoupled from storage: the host's user/role
//! persistence sits behind [`UserStore`] and [`RoleStore`].

pub mod capabilities;
pub mod roles;
pub mod user;

pub use capabilities::{Capabilities, Capability};
pub use roles::{Role, RoleDefinition, RoleStore, ensure_role};
pub use user::{User, UserStore};

use std::sync::Arc;

use coopmember_auth::{RoleStore, UserStore};
use coopmember_catalog::{ProductStore, TagStore};
use coopmember_sales::OrderStore;

/// The host's data access, one trait object per store.
///
/// A single adapter type often implements several of these (the host's catalog
/// serves both tags and products); pass the same `Arc` to each field.
#[derive(Clone)]
pub struct HostStores {
    pub tags: Arc<dyn TagStore>,
    pub roles: Arc<dyn RoleStore>,
    pub products: Arc<dyn ProductStore>,
    pub orders: Arc<dyn OrderStore>,
    pub users: Arc<dyn UserStore>,
}

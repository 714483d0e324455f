//! JSON fixtures for seeding the in-memory stores.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use coopmember_auth::User;
use coopmember_catalog::Product;
use coopmember_core::StoreError;
use coopmember_sales::Order;

use crate::in_memory::{InMemoryCatalog, InMemoryOrderBook, InMemoryUserDirectory};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seeding fixture failed: {0}")]
    Store(#[from] StoreError),
}

/// Host data snapshot: catalog, accounts and orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFixture {
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
}

impl HostFixture {
    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Upsert every record into the given stores.
    pub fn seed(
        &self,
        catalog: &InMemoryCatalog,
        users: &InMemoryUserDirectory,
        orders: &InMemoryOrderBook,
    ) -> Result<(), FixtureError> {
        for product in &self.products {
            catalog.insert_product(product.clone())?;
        }
        for user in &self.users {
            users.insert_user(user.clone())?;
        }
        for order in &self.orders {
            orders.insert_order(order.clone())?;
        }

        tracing::info!(
            products = self.products.len(),
            users = self.users.len(),
            orders = self.orders.len(),
            "seeded in-memory host stores"
        );
        Ok(())
    }
}

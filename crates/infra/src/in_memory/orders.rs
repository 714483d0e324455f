use coopmember_core::{OrderId, StoreError};
use coopmember_sales::{Order, OrderStore};

use super::{FailureInjector, InMemoryTable};

/// In-memory order storage.
#[derive(Debug, Default)]
pub struct InMemoryOrderBook {
    orders: InMemoryTable<Order>,
    failures: FailureInjector,
}

impl InMemoryOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        self.orders.upsert(order)
    }

    pub fn failures(&self) -> &FailureInjector {
        &self.failures
    }
}

impl OrderStore for InMemoryOrderBook {
    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.failures.check_read()?;
        self.orders.get(&id)
    }
}

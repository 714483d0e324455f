use serde::{Deserialize, Serialize};

use coopmember_core::{Entity, OrderId, ProductId, StoreError, UserId};

/// Order status lifecycle as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
    Refunded,
}

/// Order line: the product it references and how many were bought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_no: u32,
    /// The product may have been deleted since the order was placed; the id is
    /// kept and lookups simply come back empty.
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// A host order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    /// `None` for guest checkouts.
    #[serde(default)]
    purchaser: Option<UserId>,
    #[serde(default)]
    status: OrderStatus,
    #[serde(default)]
    lines: Vec<OrderLine>,
}

impl Order {
    pub fn new(id: OrderId, purchaser: Option<UserId>) -> Self {
        Self {
            id,
            purchaser,
            status: OrderStatus::Pending,
            lines: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Append a line for `product_id`; line numbers are assigned in order.
    pub fn with_line(mut self, product_id: ProductId, quantity: u32) -> Self {
        let line_no = (self.lines.len() as u32) + 1;
        self.lines.push(OrderLine {
            line_no,
            product_id,
            quantity,
        });
        self
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn purchaser(&self) -> Option<UserId> {
        self.purchaser
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Host order storage.
pub trait OrderStore: Send + Sync {
    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
}

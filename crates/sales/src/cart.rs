use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coopmember_core::ProductId;

/// One line of a cart being priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Host cart-item key (opaque).
    pub key: String,
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Per-unit price the host will charge. `None` until some rule (or the
    /// host's own pricing) sets it, in which case the regular price applies.
    #[serde(default)]
    effective_price: Option<Decimal>,
}

fn default_quantity() -> u32 {
    1
}

impl CartLine {
    pub fn new(key: impl Into<String>, product_id: ProductId, quantity: u32) -> Self {
        Self {
            key: key.into(),
            product_id,
            quantity,
            effective_price: None,
        }
    }

    pub fn with_effective_price(mut self, price: Decimal) -> Self {
        self.effective_price = Some(price);
        self
    }

    pub fn effective_price(&self) -> Option<Decimal> {
        self.effective_price
    }

    pub fn set_effective_price(&mut self, price: Decimal) {
        self.effective_price = Some(price);
    }
}

/// A cart for a single pricing pass (transient, request-scoped).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, line: CartLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [CartLine] {
        &mut self.lines
    }

    pub fn line(&self, key: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

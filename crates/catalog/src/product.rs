use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use coopmember_core::{Entity, ProductId, StoreError};

use crate::TagSlug;

/// A catalog product, reduced to what the membership rules consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    #[serde(default)]
    name: String,
    /// Regular (list) price in the currency's standard unit. `None` when the
    /// host has no price on record (e.g. a variable product's parent).
    #[serde(default)]
    regular_price: Option<Decimal>,
    #[serde(default)]
    tags: BTreeSet<TagSlug>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            regular_price: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_regular_price(mut self, price: Decimal) -> Self {
        self.regular_price = Some(price);
        self
    }

    pub fn with_tag(mut self, tag: TagSlug) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regular_price(&self) -> Option<Decimal> {
        self.regular_price
    }

    pub fn tags(&self) -> &BTreeSet<TagSlug> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &TagSlug) -> bool {
        self.tags.contains(tag)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Host product catalog (read-only from this workspace's perspective).
pub trait ProductStore: Send + Sync {
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(raw: &str) -> TagSlug {
        TagSlug::parse(raw).unwrap()
    }

    #[test]
    fn builder_collects_tags_and_price() {
        let product = Product::new(ProductId::new(2), "Oolong 100g")
            .with_regular_price(Decimal::new(5000, 2))
            .with_tag(slug("coop-discount"))
            .with_tag(slug("coop-discount"));

        assert_eq!(product.regular_price(), Some(Decimal::from(50)));
        assert_eq!(product.tags().len(), 1);
        assert!(product.has_tag(&slug("coop-discount")));
        assert!(!product.has_tag(&slug("coop-membership")));
    }

    #[test]
    fn deserializes_host_payload() {
        let json = r#"{
            "id": 1,
            "name": "Annual membership",
            "regular_price": "25.00",
            "tags": ["coop-membership"]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id_typed(), ProductId::new(1));
        assert_eq!(product.regular_price(), Some(Decimal::new(2500, 2)));
        assert!(product.has_tag(&slug("coop-membership")));
    }

    #[test]
    fn rejects_invalid_tag_in_payload() {
        let json = r#"{"id": 1, "tags": ["Not A Slug"]}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}

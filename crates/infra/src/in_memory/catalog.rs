use std::collections::BTreeMap;
use std::sync::RwLock;

use coopmember_catalog::{Product, ProductStore, Tag, TagSlug, TagStore};
use coopmember_core::{ProductId, StoreError};

use super::{FailureInjector, InMemoryTable};

/// In-memory product catalog and tag taxonomy.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: InMemoryTable<Product>,
    tags: RwLock<BTreeMap<TagSlug, Tag>>,
    failures: FailureInjector,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        self.products.upsert(product)
    }

    /// Simulate the host deleting a product that old orders still reference.
    pub fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.products.remove(&id)
    }

    pub fn tag(&self, slug: &TagSlug) -> Option<Tag> {
        self.tags.read().ok()?.get(slug).cloned()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.read().map(|tags| tags.len()).unwrap_or(0)
    }

    pub fn failures(&self) -> &FailureInjector {
        &self.failures
    }
}

impl TagStore for InMemoryCatalog {
    fn exists(&self, slug: &TagSlug) -> Result<bool, StoreError> {
        self.failures.check_read()?;
        let tags = self.tags.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tags.contains_key(slug))
    }

    fn create(&self, tag: Tag) -> Result<(), StoreError> {
        self.failures.check_write()?;
        let mut tags = self.tags.write().map_err(|_| StoreError::Poisoned)?;
        if tags.contains_key(&tag.slug) {
            return Err(StoreError::rejected(format!("tag '{}' already exists", tag.slug)));
        }
        tags.insert(tag.slug.clone(), tag);
        Ok(())
    }
}

impl ProductStore for InMemoryCatalog {
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.failures.check_read()?;
        self.products.get(&id)
    }
}

//! In-memory host stores for tests/dev.
//!
//! - No IO / no async
//! - `RwLock`-guarded maps; every read hands out a clone
//! - [`FailureInjector`] lets tests make reads or writes fail on demand

pub mod catalog;
pub mod orders;
pub mod users;

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use coopmember_core::{Entity, StoreError};

pub use catalog::InMemoryCatalog;
pub use orders::InMemoryOrderBook;
pub use users::InMemoryUserDirectory;

/// Switches that turn a healthy in-memory store into a failing one.
#[derive(Debug, Default)]
pub struct FailureInjector {
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailureInjector {
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Release);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    pub fn check_read(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::Acquire) {
            return Err(StoreError::unavailable("injected read failure"));
        }
        Ok(())
    }

    pub fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StoreError::rejected("injected write failure"));
        }
        Ok(())
    }
}

/// Entities keyed by their own id.
#[derive(Debug)]
pub struct InMemoryTable<E: Entity> {
    rows: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity + Clone> InMemoryTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.get(id).cloned())
    }

    /// Insert or replace the row with `entity`'s id.
    pub fn upsert(&self, entity: E) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        rows.insert(*entity.id(), entity);
        Ok(())
    }

    /// Mutate the row for `id` in place; returns `false` if there is none.
    pub fn update(&self, id: &E::Id, f: impl FnOnce(&mut E)) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        match rows.get_mut(id) {
            Some(row) => {
                f(row);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.remove(id))
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

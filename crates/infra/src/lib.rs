//! Infrastructure layer: host store adapters.
//!
//! The production host plugs its own implementations of the store traits in.
//! This crate provides the in-memory adapters used by tests, local runs and the
//! demo host, plus JSON fixtures to seed them.

pub mod fixture;
pub mod in_memory;

pub use fixture::{FixtureError, HostFixture};
pub use in_memory::{
    FailureInjector, InMemoryCatalog, InMemoryOrderBook, InMemoryTable, InMemoryUserDirectory,
};

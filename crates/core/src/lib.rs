//! `coopmember-core`: shared building blocks for the membership rules.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod provision;
pub mod value_object;

pub use entity::Entity;
pub use error::{EntityKind, RuleError, RuleResult, StoreError};
pub use id::{OrderId, ProductId, UserId};
pub use money::DiscountFraction;
pub use provision::Provisioned;
pub use value_object::ValueObject;

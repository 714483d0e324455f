//! Catalog domain module: products and the classification tags on them.
//!
//! The catalog itself is owned by the host platform. This crate models the
//! slice the membership rules read (product tags and regular price) and the one
//! write they make (provisioning a tag).

pub mod product;
pub mod tag;

pub use product::{Product, ProductStore};
pub use tag::{Tag, TagSlug, TagStore, ensure_tag};

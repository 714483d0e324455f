//! Sales domain module: completed orders and carts being priced.
//!
//! Both are owned by the host platform. Orders are read through
//! [`OrderStore`]; carts are handed to the rules by value for one pricing pass
//! and handed back with effective prices written in.

pub mod cart;
pub mod order;

pub use cart::{Cart, CartLine};
pub use order::{Order, OrderLine, OrderStatus, OrderStore};

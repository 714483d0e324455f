//! `coopmember-events`: host hook plumbing (mechanics only).
//!
//! The host platform fires named actions (`init`, order completed, cart
//! recalculated). This crate wraps each firing in an [`EventEnvelope`] and fans
//! it out, synchronously and in priority order, to registered [`HookHandler`]s.
//! No business rules live here.

pub mod dispatcher;
pub mod envelope;
pub mod event;
pub mod handler;

pub use dispatcher::{DEFAULT_PRIORITY, DispatchSummary, Dispatched, HookDispatcher};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::{HookHandler, HookOutcome};

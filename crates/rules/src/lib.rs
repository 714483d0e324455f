//! `coopmember-rules`: the cooperative's membership and discount rules.
//!
//! - [`Provisioner`]: one-time, idempotent setup of the member role and the two
//!   classification tags.
//! - [`MembershipGrantRule`]: grants the member role when an order containing a
//!   membership product completes.
//! - [`DiscountRule`]: prices discount-eligible cart lines for members, at most
//!   once per recalculation pass.
//! - [`MembershipHooks`]: wires the three to the host's hook dispatcher.
//!
//! All host data is reached through the store traits bundled in [`HostStores`].
//! No rule ever fails the host request: problems are logged and the affected
//! unit of work is skipped.

pub mod config;
pub mod context;
pub mod discount;
pub mod grant;
pub mod hooks;
pub mod provisioning;
pub mod stores;

pub use config::MembershipConfig;
pub use context::{RecalculationPass, RequestContext};
pub use discount::{DiscountOutcome, DiscountRule, SkipReason};
pub use grant::{GrantOutcome, MembershipGrantRule};
pub use hooks::{CartRecalculate, HostEvent, MembershipHooks, OrderCompleted};
pub use provisioning::{Provisioner, ProvisioningReport};
pub use stores::HostStores;

use coopmember_core::RuleError;

/// Missing records are expected churn (`warn`); anything else is a fault (`error`).
pub(crate) fn log_rule_error(err: &RuleError, what: &'static str) {
    if err.is_not_found() {
        tracing::warn!(error = %err, "{what}");
    } else {
        tracing::error!(error = %err, "{what}");
    }
}

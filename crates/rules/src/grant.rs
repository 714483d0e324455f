//! Membership grant on order completion.
//!
//! A completed order containing at least one product tagged with the
//! membership tag grants the purchaser the member role. Grants only ever add:
//! re-running the rule for the same order leaves the role set unchanged, and
//! nothing here revokes a role.

use std::sync::Arc;

use serde::Serialize;

use coopmember_auth::UserStore;
use coopmember_catalog::ProductStore;
use coopmember_core::{EntityKind, OrderId, ProductId, RuleError, RuleResult, UserId};
use coopmember_sales::OrderStore;

use crate::{HostStores, MembershipConfig, log_rule_error};

/// What [`MembershipGrantRule::on_order_completed`] decided.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GrantOutcome {
    /// The purchaser was given the member role.
    Granted { user_id: UserId },
    /// The purchaser already held the member role; nothing was written.
    AlreadyMember { user_id: UserId },
    /// No line references a membership product.
    NoMembershipItems,
    /// The order could not be read.
    OrderUnavailable,
    /// A membership product was bought but there is no account to grant:
    /// a guest checkout, an unknown user or a failed role write.
    PurchaserUnavailable,
}

pub struct MembershipGrantRule {
    config: Arc<MembershipConfig>,
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
}

impl MembershipGrantRule {
    /// Fails with [`RuleError::Config`] when `config` does not validate.
    pub fn new(config: Arc<MembershipConfig>, stores: &HostStores) -> RuleResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            orders: stores.orders.clone(),
            products: stores.products.clone(),
            users: stores.users.clone(),
        })
    }

    /// Evaluate a completed order.
    ///
    /// Lines are scanned in order. The first membership line that reaches a
    /// grant decision ends the scan; a missing product or a failed grant is
    /// logged and the scan moves on to the next line.
    pub fn on_order_completed(&self, order_id: OrderId) -> GrantOutcome {
        let span = tracing::info_span!("membership_grant", order_id = %order_id);
        let _entered = span.enter();

        let order = match self.orders.get(order_id) {
            Ok(Some(order)) => order,
            Ok(None) => {
                log_rule_error(
                    &RuleError::not_found(EntityKind::Order, order_id),
                    "completed order lookup failed",
                );
                return GrantOutcome::OrderUnavailable;
            }
            Err(err) => {
                log_rule_error(&err.into(), "completed order lookup failed");
                return GrantOutcome::OrderUnavailable;
            }
        };

        let mut saw_membership = false;
        for line in order.lines() {
            match self.is_membership_product(line.product_id) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    log_rule_error(&err, "skipping order line");
                    continue;
                }
            }
            saw_membership = true;

            let Some(user_id) = order.purchaser() else {
                tracing::info!(
                    line_no = line.line_no,
                    "guest order contains a membership product; no account to grant"
                );
                break;
            };

            match self.grant_to(user_id) {
                Ok(outcome) => return outcome,
                Err(err) => log_rule_error(&err, "membership grant failed"),
            }
        }

        if saw_membership {
            GrantOutcome::PurchaserUnavailable
        } else {
            tracing::debug!("order has no membership products");
            GrantOutcome::NoMembershipItems
        }
    }

    fn is_membership_product(&self, id: ProductId) -> RuleResult<bool> {
        let product = self
            .products
            .get(id)?
            .ok_or_else(|| RuleError::not_found(EntityKind::Product, id))?;
        Ok(product.has_tag(&self.config.membership_tag.slug))
    }

    fn grant_to(&self, user_id: UserId) -> RuleResult<GrantOutcome> {
        let user = self
            .users
            .get(user_id)?
            .ok_or_else(|| RuleError::not_found(EntityKind::User, user_id))?;

        let role = &self.config.member_role.role;
        if user.has_role(role) {
            tracing::debug!(user_id = %user_id, role = %role, "purchaser is already a member");
            return Ok(GrantOutcome::AlreadyMember { user_id });
        }

        self.users.add_role(user_id, role.clone())?;
        tracing::info!(user_id = %user_id, role = %role, "granted membership role");
        Ok(GrantOutcome::Granted { user_id })
    }
}

//! Member discount on cart recalculation.
//!
//! The host recomputes cart totals by firing the recalculation hook, often
//! more than once for a single computation. Each firing writes a price derived
//! from the product's *regular* price, and at most one firing per
//! [`RecalculationPass`] writes at all, so the discount never compounds.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use coopmember_auth::UserStore;
use coopmember_catalog::ProductStore;
use coopmember_core::{EntityKind, ProductId, RuleError, RuleResult};
use coopmember_sales::Cart;

use crate::{HostStores, MembershipConfig, RecalculationPass, RequestContext, log_rule_error};

/// Why a firing left the cart untouched. Checked in declaration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Administration-area request that is not an explicit async call.
    AdminWithoutAsync,
    Anonymous,
    /// The authenticated user could not be loaded.
    UserNotFound,
    /// The user lacks the member role (and the request is not administrative).
    NotMember,
    /// The pass was already priced, or this firing is past the re-entrancy limit.
    Reentrant,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountOutcome {
    Applied { discounted_lines: usize },
    Skipped(SkipReason),
}

pub struct DiscountRule {
    config: Arc<MembershipConfig>,
    products: Arc<dyn ProductStore>,
    users: Arc<dyn UserStore>,
}

impl DiscountRule {
    /// Fails with [`RuleError::Config`] when `config` does not validate.
    pub fn new(config: Arc<MembershipConfig>, stores: &HostStores) -> RuleResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            products: stores.products.clone(),
            users: stores.users.clone(),
        })
    }

    /// Price the discount-eligible lines of `cart` for a member.
    ///
    /// Every call counts as one firing on `pass`, whether or not it prices
    /// anything.
    pub fn on_cart_recalculate(
        &self,
        cart: &mut Cart,
        request: &RequestContext,
        pass: &RecalculationPass,
    ) -> DiscountOutcome {
        let invocation = pass.record_invocation();

        if let Some(reason) = self.skip_reason(request, pass, invocation) {
            tracing::debug!(?reason, invocation, "cart discount skipped");
            return DiscountOutcome::Skipped(reason);
        }

        let mut discounted_lines = 0;
        for line in cart.lines_mut() {
            match self.member_price(line.product_id) {
                Ok(Some(price)) => {
                    tracing::debug!(key = %line.key, product_id = %line.product_id, %price, "member price set");
                    line.set_effective_price(price);
                    discounted_lines += 1;
                }
                Ok(None) => {}
                Err(err) => log_rule_error(&err, "skipping cart line"),
            }
        }

        pass.mark_discounted();
        tracing::info!(
            discounted_lines,
            invocation,
            discount = %self.config.discount,
            "applied member discount"
        );
        DiscountOutcome::Applied { discounted_lines }
    }

    fn skip_reason(
        &self,
        request: &RequestContext,
        pass: &RecalculationPass,
        invocation: u32,
    ) -> Option<SkipReason> {
        if request.admin_context && !request.async_request {
            return Some(SkipReason::AdminWithoutAsync);
        }

        let Some(user_id) = request.current_user else {
            return Some(SkipReason::Anonymous);
        };

        let user = match self.users.get(user_id) {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(user_id = %user_id, "current user not found");
                return Some(SkipReason::UserNotFound);
            }
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "current user lookup failed");
                return Some(SkipReason::UserNotFound);
            }
        };

        if !user.has_role(&self.config.member_role.role) && !request.admin_context {
            return Some(SkipReason::NotMember);
        }

        if invocation >= self.config.reentrancy_limit || pass.is_discounted() {
            return Some(SkipReason::Reentrant);
        }

        None
    }

    /// `Some(price)` for a discount-tagged product with a regular price.
    fn member_price(&self, id: ProductId) -> RuleResult<Option<Decimal>> {
        let product = self
            .products
            .get(id)?
            .ok_or_else(|| RuleError::not_found(EntityKind::Product, id))?;

        if !product.has_tag(&self.config.discount_tag.slug) {
            return Ok(None);
        }

        match product.regular_price() {
            Some(regular) => Ok(Some(self.config.discount.apply(regular))),
            None => {
                tracing::warn!(product_id = %id, "discount product has no regular price");
                Ok(None)
            }
        }
    }
}

//! Host hook wiring.
//!
//! The host fires three triggers this workspace reacts to:
//!
//! | trigger                  | handler                                  |
//! |--------------------------|------------------------------------------|
//! | `host.process.init`      | [`Provisioner::run`]                     |
//! | `host.order.completed`   | [`MembershipGrantRule::on_order_completed`] |
//! | `host.cart.recalculate`  | [`DiscountRule::on_cart_recalculate`]    |
//!
//! Payloads are owned by the envelope; the host takes the repriced cart back
//! with [`CartRecalculate::into_cart`] after dispatch.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use coopmember_core::{OrderId, RuleResult};
use coopmember_events::{Event, EventEnvelope, HookDispatcher, HookHandler, HookOutcome};
use coopmember_sales::Cart;

use crate::{
    DiscountOutcome, DiscountRule, GrantOutcome, HostStores, MembershipConfig,
    MembershipGrantRule, Provisioner, RecalculationPass, RequestContext,
};

/// An order reached the completed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCompleted {
    pub order_id: OrderId,
    pub completed_at: DateTime<Utc>,
    /// Filled in by [`MembershipHooks`].
    pub outcome: Option<GrantOutcome>,
}

impl OrderCompleted {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            completed_at: Utc::now(),
            outcome: None,
        }
    }
}

/// The host is recomputing a cart's prices.
#[derive(Debug)]
pub struct CartRecalculate {
    pub cart: Cart,
    pub request: RequestContext,
    /// Shared by every firing within one cart-recalculation request.
    pub pass: Arc<RecalculationPass>,
    /// Filled in by [`MembershipHooks`].
    pub outcome: Option<DiscountOutcome>,
}

impl CartRecalculate {
    pub fn new(cart: Cart, request: RequestContext, pass: Arc<RecalculationPass>) -> Self {
        Self {
            cart,
            request,
            pass,
            outcome: None,
        }
    }

    pub fn into_cart(self) -> Cart {
        self.cart
    }
}

#[derive(Debug)]
pub enum HostEvent {
    ProcessInit,
    OrderCompleted(OrderCompleted),
    CartRecalculate(CartRecalculate),
}

impl Event for HostEvent {
    fn event_type(&self) -> &'static str {
        match self {
            HostEvent::ProcessInit => "host.process.init",
            HostEvent::OrderCompleted(_) => "host.order.completed",
            HostEvent::CartRecalculate(_) => "host.cart.recalculate",
        }
    }
}

/// Routes host triggers to the provisioning step and the two rules.
pub struct MembershipHooks {
    provisioner: Provisioner,
    grant: MembershipGrantRule,
    discount: DiscountRule,
}

impl MembershipHooks {
    /// Fails with [`RuleError::Config`](coopmember_core::RuleError::Config)
    /// when `config` does not validate.
    pub fn new(config: Arc<MembershipConfig>, stores: &HostStores) -> RuleResult<Self> {
        Ok(Self {
            provisioner: Provisioner::new(config.clone(), stores.tags.clone(), stores.roles.clone())?,
            grant: MembershipGrantRule::new(config.clone(), stores)?,
            discount: DiscountRule::new(config, stores)?,
        })
    }

    /// Register with `dispatcher` at the default priority.
    pub fn install(self: Arc<Self>, dispatcher: &mut HookDispatcher<HostEvent>) {
        dispatcher.register(self);
    }
}

impl HookHandler<HostEvent> for MembershipHooks {
    fn name(&self) -> &'static str {
        "coop_membership"
    }

    fn handle(&self, envelope: &mut EventEnvelope<HostEvent>) -> RuleResult<HookOutcome> {
        match envelope.payload_mut() {
            HostEvent::ProcessInit => {
                self.provisioner.run().into_result()?;
            }
            HostEvent::OrderCompleted(event) => {
                event.outcome = Some(self.grant.on_order_completed(event.order_id));
            }
            HostEvent::CartRecalculate(event) => {
                let outcome = self
                    .discount
                    .on_cart_recalculate(&mut event.cart, &event.request, &event.pass);
                event.outcome = Some(outcome);
            }
        }
        Ok(HookOutcome::Handled)
    }
}

#[cfg(test)]
mod tests {
    use coopmember_events::DispatchSummary;
    use coopmember_infra::{InMemoryCatalog, InMemoryOrderBook, InMemoryUserDirectory};

    use super::*;

    fn dispatcher(catalog: Arc<InMemoryCatalog>) -> HookDispatcher<HostEvent> {
        let users = Arc::new(InMemoryUserDirectory::new());
        let stores = HostStores {
            tags: catalog.clone(),
            roles: users.clone(),
            products: catalog,
            orders: Arc::new(InMemoryOrderBook::new()),
            users,
        };
        let mut dispatcher = HookDispatcher::new();
        Arc::new(MembershipHooks::new(Arc::new(MembershipConfig::default()), &stores).unwrap())
            .install(&mut dispatcher);
        dispatcher
    }

    #[test]
    fn event_types_are_stable() {
        assert_eq!(HostEvent::ProcessInit.event_type(), "host.process.init");
        assert_eq!(
            HostEvent::OrderCompleted(OrderCompleted::new(OrderId::new(1))).event_type(),
            "host.order.completed"
        );
        let recalc = CartRecalculate::new(Cart::new(), RequestContext::default(), Arc::default());
        assert_eq!(HostEvent::CartRecalculate(recalc).event_type(), "host.cart.recalculate");
    }

    #[test]
    fn invalid_config_is_refused() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let stores = HostStores {
            tags: catalog.clone(),
            roles: users.clone(),
            products: catalog,
            orders: Arc::new(InMemoryOrderBook::new()),
            users,
        };
        let config = Arc::new(MembershipConfig::default().with_reentrancy_limit(1));

        assert!(matches!(
            MembershipHooks::new(config, &stores),
            Err(coopmember_core::RuleError::Config(_))
        ));
    }

    #[test]
    fn installs_under_its_name() {
        let dispatcher = dispatcher(Arc::new(InMemoryCatalog::new()));
        assert_eq!(dispatcher.handler_names(), vec!["coop_membership"]);
    }

    #[test]
    fn process_init_provisions_tags() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let dispatcher = dispatcher(catalog.clone());

        let dispatched = dispatcher.dispatch(HostEvent::ProcessInit);

        assert_eq!(dispatched.summary.handled, 1);
        assert_eq!(catalog.tag_count(), 2);
    }

    #[test]
    fn provisioning_failure_is_contained_by_the_dispatcher() {
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.failures().set_fail_writes(true);
        let dispatcher = dispatcher(catalog);

        let dispatched = dispatcher.dispatch(HostEvent::ProcessInit);

        assert_eq!(
            dispatched.summary,
            DispatchSummary {
                handled: 0,
                ignored: 0,
                failed: 1
            }
        );
    }

    #[test]
    fn outcomes_are_written_back_to_the_payload() {
        let dispatcher = dispatcher(Arc::new(InMemoryCatalog::new()));

        let dispatched = dispatcher.dispatch(HostEvent::OrderCompleted(OrderCompleted::new(OrderId::new(9))));
        match dispatched.envelope.into_payload() {
            HostEvent::OrderCompleted(event) => {
                assert_eq!(event.outcome, Some(GrantOutcome::OrderUnavailable))
            }
            other => panic!("Expected OrderCompleted, got {other:?}"),
        }

        let recalc = CartRecalculate::new(Cart::new(), RequestContext::storefront(None), Arc::default());
        let dispatched = dispatcher.dispatch(HostEvent::CartRecalculate(recalc));
        match dispatched.envelope.into_payload() {
            HostEvent::CartRecalculate(event) => {
                assert_eq!(event.pass.invocations(), 1);
                assert_eq!(
                    event.outcome,
                    Some(DiscountOutcome::Skipped(crate::SkipReason::Anonymous))
                );
                assert!(event.into_cart().is_empty());
            }
            other => panic!("Expected CartRecalculate, got {other:?}"),
        }
    }
}

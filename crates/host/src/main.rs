use std::sync::Arc;

use anyhow::Context;

use coopmember_core::UserId;
use coopmember_events::HookDispatcher;
use coopmember_infra::{HostFixture, InMemoryCatalog, InMemoryOrderBook, InMemoryUserDirectory};
use coopmember_rules::{
    CartRecalculate, HostEvent, HostStores, MembershipConfig, MembershipHooks, OrderCompleted,
    RecalculationPass, RequestContext,
};
use coopmember_sales::{Cart, CartLine};

const ENV_FIXTURE: &str = "COOPMEMBER_FIXTURE";
const DEMO_FIXTURE: &str = include_str!("../fixtures/demo.json");

/// How many times the demo fires the recalculation hook per cart, like the
/// host does when it totals a cart.
const RECALCULATIONS_PER_REQUEST: usize = 2;

fn main() -> anyhow::Result<()> {
    coopmember_observability::init();

    let config = Arc::new(MembershipConfig::from_env().context("invalid membership configuration")?);
    let fixture = load_fixture()?;

    let catalog = Arc::new(InMemoryCatalog::new());
    let users = Arc::new(InMemoryUserDirectory::new());
    let orders = Arc::new(InMemoryOrderBook::new());
    fixture
        .seed(&catalog, &users, &orders)
        .context("failed to seed in-memory stores")?;

    let stores = HostStores {
        tags: catalog.clone(),
        roles: users.clone(),
        products: catalog,
        orders,
        users,
    };
    let mut dispatcher = HookDispatcher::new();
    Arc::new(MembershipHooks::new(config, &stores).context("failed to build membership hooks")?)
        .install(&mut dispatcher);

    let init = dispatcher.dispatch(HostEvent::ProcessInit);
    tracing::info!(summary = ?init.summary, "process init dispatched");

    for order in fixture.orders.iter().filter(|o| o.is_completed()) {
        let event = HostEvent::OrderCompleted(OrderCompleted::new(order.id_typed()));
        if let HostEvent::OrderCompleted(event) = dispatcher.dispatch(event).envelope.into_payload() {
            tracing::info!(order_id = %event.order_id, outcome = ?event.outcome, "order completed");
        }
    }

    for user in &fixture.users {
        let cart = price_cart(&dispatcher, full_cart(&fixture), user.id_typed())?;
        println!(
            "{}",
            serde_json::to_string_pretty(&cart).context("failed to render cart")?
        );
    }

    Ok(())
}

fn load_fixture() -> anyhow::Result<HostFixture> {
    let json = match std::env::var(ENV_FIXTURE) {
        Ok(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read fixture {path}"))?,
        Err(_) => DEMO_FIXTURE.to_string(),
    };
    HostFixture::from_json_str(&json).context("failed to parse fixture")
}

/// One line per catalog product, at its regular price.
fn full_cart(fixture: &HostFixture) -> Cart {
    let mut cart = Cart::new();
    for product in &fixture.products {
        let mut line = CartLine::new(format!("p{}", product.id_typed()), product.id_typed(), 1);
        if let Some(price) = product.regular_price() {
            line.set_effective_price(price);
        }
        cart.push(line);
    }
    cart
}

/// Run one cart-recalculation request for `user`.
fn price_cart(
    dispatcher: &HookDispatcher<HostEvent>,
    mut cart: Cart,
    user: UserId,
) -> anyhow::Result<Cart> {
    let pass = Arc::new(RecalculationPass::new());
    let request = RequestContext::storefront(Some(user));

    for _ in 0..RECALCULATIONS_PER_REQUEST {
        let event = HostEvent::CartRecalculate(CartRecalculate::new(cart, request, pass.clone()));
        let HostEvent::CartRecalculate(event) = dispatcher.dispatch(event).envelope.into_payload()
        else {
            anyhow::bail!("cart recalculation dispatch returned a different event");
        };
        tracing::info!(user_id = %user, outcome = ?event.outcome, "cart recalculated");
        cart = event.into_cart();
    }
    Ok(cart)
}

//! Request-scoped context handed to the discount rule.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use coopmember_core::UserId;

/// Who is asking and from where, as reported by the host for one request.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// The request is served from the host's administration area.
    pub admin_context: bool,
    /// The request is an explicit asynchronous (AJAX-style) call.
    pub async_request: bool,
    /// Authenticated user, `None` for anonymous visitors.
    pub current_user: Option<UserId>,
}

impl RequestContext {
    /// A storefront request.
    pub fn storefront(current_user: Option<UserId>) -> Self {
        Self {
            admin_context: false,
            async_request: false,
            current_user,
        }
    }

    /// A request from the administration area.
    pub fn admin(current_user: Option<UserId>, async_request: bool) -> Self {
        Self {
            admin_context: true,
            async_request,
            current_user,
        }
    }
}

/// State of one cart-recalculation pass.
///
/// Create one per cart-recalculation request and pass it (shared) to every
/// firing of the recalculation hook within that request. It tracks how many
/// times the hook fired and whether the discount was already written, so a
/// price that was discounted once is never discounted again.
#[derive(Debug, Default)]
pub struct RecalculationPass {
    invocations: AtomicU32,
    discounted: AtomicBool,
}

impl RecalculationPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pass on which the host has already fired the hook `count` times.
    pub fn with_prior_invocations(count: u32) -> Self {
        Self {
            invocations: AtomicU32::new(count),
            discounted: AtomicBool::new(false),
        }
    }

    /// Record one firing; returns its 1-based ordinal.
    pub fn record_invocation(&self) -> u32 {
        self.invocations.fetch_add(1, Ordering::AcqRel).saturating_add(1)
    }

    pub fn invocations(&self) -> u32 {
        self.invocations.load(Ordering::Acquire)
    }

    pub fn is_discounted(&self) -> bool {
        self.discounted.load(Ordering::Acquire)
    }

    /// Flag the pass as discounted; returns `false` if it already was.
    pub fn mark_discounted(&self) -> bool {
        self.discounted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

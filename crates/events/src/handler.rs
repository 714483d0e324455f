use coopmember_core::RuleResult;

use crate::{Event, EventEnvelope};

/// What a handler did with an event it was offered.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The handler reacted to the event (even if the reaction was a no-op).
    Handled,
    /// The event is not one this handler listens to.
    Ignored,
}

/// Reacts to host hook firings (the equivalent of an action callback).
///
/// Handlers run synchronously on the host's request thread. Returning an error
/// never aborts the host request: the [`HookDispatcher`](crate::HookDispatcher)
/// logs it and carries on with the next handler.
pub trait HookHandler<E: Event>: Send + Sync {
    /// Stable handler name used in logs.
    fn name(&self) -> &'static str;

    fn handle(&self, envelope: &mut EventEnvelope<E>) -> RuleResult<HookOutcome>;
}

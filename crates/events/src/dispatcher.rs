//! Synchronous in-process hook dispatcher.
//!
//! Mirrors the host platform's action registry:
//!
//! ```text
//! host fires hook → HookDispatcher::dispatch → handler(priority 5)
//!                                             → handler(priority 10)
//!                                             → ...
//! ```
//!
//! - No IO / no async: handlers run on the caller's thread, in ascending
//!   priority, ties broken by registration order.
//! - Failures are contained: a handler error is logged and counted, and the
//!   remaining handlers still run.

use std::sync::Arc;

use crate::{Event, EventEnvelope, HookHandler, HookOutcome};

/// Priority used by [`HookDispatcher::register`], matching the host default.
pub const DEFAULT_PRIORITY: i32 = 10;

struct Registration<E: Event> {
    priority: i32,
    handler: Arc<dyn HookHandler<E>>,
}

/// Ordered registry of hook handlers.
pub struct HookDispatcher<E: Event> {
    registrations: Vec<Registration<E>>,
}

/// Counters for one dispatch.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub handled: usize,
    pub ignored: usize,
    pub failed: usize,
}

/// Result of a dispatch: the (possibly mutated) envelope plus counters.
#[derive(Debug)]
pub struct Dispatched<E> {
    pub envelope: EventEnvelope<E>,
    pub summary: DispatchSummary,
}

impl<E: Event> HookDispatcher<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler at [`DEFAULT_PRIORITY`].
    pub fn register(&mut self, handler: Arc<dyn HookHandler<E>>) -> &mut Self {
        self.register_with_priority(DEFAULT_PRIORITY, handler)
    }

    /// Register a handler; lower priorities run first.
    pub fn register_with_priority(
        &mut self,
        priority: i32,
        handler: Arc<dyn HookHandler<E>>,
    ) -> &mut Self {
        // Insert after every registration with priority <= this one (stable).
        let at = self
            .registrations
            .partition_point(|r| r.priority <= priority);
        self.registrations
            .insert(at, Registration { priority, handler });
        self
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Handler names in the order they will run.
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.registrations.iter().map(|r| r.handler.name()).collect()
    }

    /// Fire `event` through every registered handler.
    pub fn dispatch(&self, event: E) -> Dispatched<E> {
        self.dispatch_envelope(EventEnvelope::new(event))
    }

    /// Fire a pre-built envelope through every registered handler.
    pub fn dispatch_envelope(&self, mut envelope: EventEnvelope<E>) -> Dispatched<E> {
        let span = tracing::info_span!(
            "hook_dispatch",
            dispatch_id = %envelope.dispatch_id(),
            received_at = %envelope.received_at(),
            event_type = envelope.payload().event_type(),
        );
        let _entered = span.enter();

        let mut summary = DispatchSummary::default();
        for registration in &self.registrations {
            let name = registration.handler.name();
            match registration.handler.handle(&mut envelope) {
                Ok(HookOutcome::Handled) => {
                    tracing::debug!(handler = name, "hook handled");
                    summary.handled += 1;
                }
                Ok(HookOutcome::Ignored) => {
                    summary.ignored += 1;
                }
                Err(err) => {
                    tracing::error!(handler = name, error = %err, "hook handler failed");
                    summary.failed += 1;
                }
            }
        }

        Dispatched { envelope, summary }
    }
}

impl<E: Event> Default for HookDispatcher<E> {
    fn default() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use coopmember_core::{RuleError, RuleResult, StoreError};

    use super::*;

    #[derive(Debug)]
    struct Ping {
        trail: Vec<&'static str>,
    }

    impl Event for Ping {
        fn event_type(&self) -> &'static str {
            "test.ping"
        }
    }

    struct Recorder {
        name: &'static str,
        fail: bool,
        ignore: bool,
        seen: Mutex<usize>,
    }

    impl Recorder {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                fail: false,
                ignore: false,
                seen: Mutex::new(0),
            }
        }
    }

    impl HookHandler<Ping> for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn handle(&self, envelope: &mut EventEnvelope<Ping>) -> RuleResult<HookOutcome> {
            *self.seen.lock().unwrap() += 1;
            if self.fail {
                return Err(RuleError::ExternalStore(StoreError::unavailable("down")));
            }
            if self.ignore {
                return Ok(HookOutcome::Ignored);
            }
            envelope.payload_mut().trail.push(self.name);
            Ok(HookOutcome::Handled)
        }
    }

    #[test]
    fn runs_handlers_in_priority_then_registration_order() {
        let mut dispatcher = HookDispatcher::new();
        dispatcher
            .register(Arc::new(Recorder::new("b")))
            .register_with_priority(5, Arc::new(Recorder::new("a")))
            .register(Arc::new(Recorder::new("c")))
            .register_with_priority(20, Arc::new(Recorder::new("d")));

        assert_eq!(dispatcher.handler_names(), vec!["a", "b", "c", "d"]);

        let dispatched = dispatcher.dispatch(Ping { trail: Vec::new() });
        assert_eq!(dispatched.envelope.payload().trail, vec!["a", "b", "c", "d"]);
        assert_eq!(dispatched.summary.handled, 4);
    }

    #[test]
    fn failing_handler_does_not_stop_the_rest() {
        let failing = Arc::new(Recorder {
            fail: true,
            ..Recorder::new("failing")
        });
        let after = Arc::new(Recorder::new("after"));

        let mut dispatcher = HookDispatcher::new();
        dispatcher.register(failing.clone()).register(after.clone());

        let dispatched = dispatcher.dispatch(Ping { trail: Vec::new() });
        assert_eq!(
            dispatched.summary,
            DispatchSummary {
                handled: 1,
                ignored: 0,
                failed: 1
            }
        );
        assert_eq!(*failing.seen.lock().unwrap(), 1);
        assert_eq!(dispatched.envelope.into_payload().trail, vec!["after"]);
    }

    #[test]
    fn ignored_events_are_counted_separately() {
        let mut dispatcher = HookDispatcher::new();
        dispatcher.register(Arc::new(Recorder {
            ignore: true,
            ..Recorder::new("quiet")
        }));

        let dispatched = dispatcher.dispatch(Ping { trail: Vec::new() });
        assert_eq!(dispatched.summary.ignored, 1);
        assert!(dispatched.envelope.payload().trail.is_empty());
    }

    #[test]
    fn envelope_metadata_survives_dispatch() {
        let dispatch_id = uuid::Uuid::now_v7();
        let received_at = chrono::Utc::now();
        let mut dispatcher = HookDispatcher::new();
        dispatcher.register(Arc::new(Recorder::new("only")));

        let dispatched = dispatcher.dispatch_envelope(EventEnvelope::with_metadata(
            dispatch_id,
            received_at,
            Ping { trail: Vec::new() },
        ));

        assert_eq!(dispatched.envelope.dispatch_id(), dispatch_id);
        assert_eq!(dispatched.envelope.received_at(), received_at);
        assert_eq!(dispatched.envelope.payload().trail, vec!["only"]);
    }

    #[test]
    fn empty_dispatcher_is_a_no_op() {
        let dispatcher: HookDispatcher<Ping> = HookDispatcher::default();
        assert!(dispatcher.is_empty());
        let dispatched = dispatcher.dispatch(Ping { trail: Vec::new() });
        assert_eq!(dispatched.summary, DispatchSummary::default());
    }
}

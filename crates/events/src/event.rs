/// A host trigger that rules can react to.
///
/// Events are:
/// - **named** with a stable type identifier (e.g. "host.order.completed")
/// - owned by the dispatch: handlers may mutate request-scoped payloads
///   (a cart being priced) but never the identity of the trigger itself
pub trait Event: core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier.
    fn event_type(&self) -> &'static str;
}

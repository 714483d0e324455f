use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Envelope for a single firing of a host hook.
///
/// Notes:
/// - `dispatch_id` is a UUIDv7, so ids sort by arrival. It and `received_at`
///   are carried on the dispatch span to correlate every log line one firing
///   produces.
/// - `payload` is mutable through [`EventEnvelope::payload_mut`]: handlers for
///   price calculation write their results back into it and the host reads them
///   out with [`EventEnvelope::into_payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope<E> {
    dispatch_id: Uuid,
    received_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    /// Wrap a payload with a fresh dispatch id and the current time.
    pub fn new(payload: E) -> Self {
        Self::with_metadata(Uuid::now_v7(), Utc::now(), payload)
    }

    /// Wrap a payload with explicit metadata (deterministic tests, replays).
    pub fn with_metadata(dispatch_id: Uuid, received_at: DateTime<Utc>, payload: E) -> Self {
        Self {
            dispatch_id,
            received_at,
            payload,
        }
    }

    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut E {
        &mut self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

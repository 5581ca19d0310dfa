//! Outbound domain events.
//!
//! On each booking transition and each wallet mutation the engine emits a
//! `DomainEvent`; delivery (push, email, in-app) is the notification layer's
//! responsibility. The engine only guarantees the event is handed to the
//! configured [`EventSink`] after the underlying state change committed.

use std::sync::Mutex;

use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    BookingRequested,
    BookingConfirmed,
    BookingPaymentCompleted,
    BookingCancelled,
    BookingCompleted,
    WalletCredited,
    WalletDebited,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BookingRequested => "booking_requested",
            Self::BookingConfirmed => "booking_confirmed",
            Self::BookingPaymentCompleted => "booking_payment_completed",
            Self::BookingCancelled => "booking_cancelled",
            Self::BookingCompleted => "booking_completed",
            Self::WalletCredited => "wallet_credited",
            Self::WalletDebited => "wallet_debited",
        }
    }
}

/// One notification-worthy fact about a user.
#[derive(Clone, Debug)]
pub struct DomainEvent {
    pub subject_user_id: String,
    pub kind: EventKind,
    pub payload: Value,
}

impl DomainEvent {
    pub fn new(subject_user_id: impl Into<String>, kind: EventKind, payload: Value) -> Self {
        Self {
            subject_user_id: subject_user_id.into(),
            kind,
            payload,
        }
    }
}

/// Where emitted events go. Implementations must tolerate being called from
/// concurrent engine operations.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);
}

/// Default sink: structured log lines, nothing else.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: DomainEvent) {
        tracing::info!(
            subject = %event.subject_user_id,
            kind = event.kind.as_str(),
            payload = %event.payload,
            "domain event"
        );
    }
}

/// Test sink that remembers everything it saw.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Count of events of a given kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events()
            .iter()
            .filter(|event| event.kind == kind)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: DomainEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{DomainEvent, EventKind, EventSink, Policy, TracingSink};

mod bookings;
mod listings;
mod sweeper;
mod users;
mod wallets;

pub use sweeper::SweepReport;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The booking and wallet engine. One instance per process, cheap to share
/// behind an `Arc`.
///
/// Every mutating method takes `now` explicitly; the engine never reads the
/// system clock, so lifecycle behavior is reproducible under test.
pub struct Engine {
    database: DatabaseConnection,
    policy: Policy,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub(crate) fn emit(
        &self,
        subject_user_id: &str,
        kind: EventKind,
        payload: serde_json::Value,
    ) {
        self.events
            .emit(DomainEvent::new(subject_user_id, kind, payload));
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    policy: Policy,
    events: Option<Arc<dyn EventSink>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default [`Policy`].
    pub fn policy(mut self, policy: Policy) -> EngineBuilder {
        self.policy = policy;
        self
    }

    /// Override the default [`TracingSink`].
    pub fn events(mut self, sink: Arc<dyn EventSink>) -> EngineBuilder {
        self.events = Some(sink);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            policy: self.policy,
            events: self.events.unwrap_or_else(|| Arc::new(TracingSink)),
        }
    }
}

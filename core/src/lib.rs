//! # Burrito Club Core
//!
//! Event-sourced order ledger for a food-ordering group.
//!
//! The only durable state is an append-only [`event_log::EventLog`] of typed
//! [`event::Event`]s. Everything the bot answers with (open orders, order
//! contents, balances, the SMS summary) is a [`projection`] recomputed from
//! the log on every query. The [`service::OrderService`] is the command side:
//! it validates preconditions against the projections and appends exactly
//! one event per accepted command.
//!
//! ## Architecture principles
//!
//! - Events are immutable facts; the log is append-only.
//! - Read models are pure folds, recomputed per request, never cached.
//! - Invariants (one open order, no duplicate dates) are enforced at the
//!   service layer, not by storage.
//! - External dependencies (clock, id generation, storage) are injected via
//!   traits, never read from ambient global state.

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod codec;
pub mod event;
pub mod event_log;
pub mod order;
pub mod pricing;
pub mod projection;
pub mod service;
pub mod sms;
pub mod types;

/// Environment traits: injected dependencies abstracted for testability.
///
/// Production implementations live here; deterministic test doubles
/// (`FixedClock`, `SequentialIdGenerator`) live in `burrito-club-testing`.
pub mod environment {
    use crate::event::EventId;
    use chrono::{DateTime, Timelike, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability.
    pub trait Clock: Send + Sync {
        /// Get the current time.
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock, truncated to millisecond precision so that generated
    /// timestamps survive the row codec unchanged.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            let now = Utc::now();
            now.with_nanosecond(now.nanosecond() / 1_000_000 * 1_000_000)
                .unwrap_or(now)
        }
    }

    /// Id generation trait - abstracts event id creation for testability.
    pub trait IdGenerator: Send + Sync {
        /// Generate a fresh, unique event id.
        fn generate(&self) -> EventId;
    }

    /// Production id generator backed by UUID v4.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct UuidIdGenerator;

    impl IdGenerator for UuidIdGenerator {
        fn generate(&self) -> EventId {
            EventId::new(Uuid::new_v4().to_string())
        }
    }

}

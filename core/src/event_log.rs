//! Event log trait: the append-only storage abstraction the core runs on.
//!
//! The log is the only durable state in the system. Everything else (open
//! orders, order contents, balances) is recomputed from it on every query.
//!
//! # Contract
//!
//! - `append` records one event at the end of the log, preserving insertion
//!   order. The optional `expected_len` token implements optimistic
//!   concurrency: a command that read `n` events may demand the log still
//!   hold exactly `n` at append time, turning the read-validate-append race
//!   into an explicit [`EventLogError::Conflict`].
//! - `events` returns matching events oldest-first; an absent filter returns
//!   the full log.
//!
//! # Implementations
//!
//! - `InMemoryEventLog` (in `burrito-club-testing`): fast, deterministic
//!   testing, also the backend of the demo binary.
//! - Row-oriented production adapters (spreadsheet, file, database) live
//!   outside the core; they only need the row codec of [`crate::codec`].
//!
//! # Dyn compatibility
//!
//! The trait returns explicit `Pin<Box<dyn Future>>` instead of `async fn`
//! so it can be used as a trait object (`Arc<dyn EventLog>`) injected into
//! the order service.

use crate::codec::CodecError;
use crate::event::{Event, EventType};
use crate::types::{OrderDate, UserId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during event log operations.
#[derive(Error, Debug)]
pub enum EventLogError {
    /// Transport or backend failure while reading or appending.
    ///
    /// Possibly transient; the core does not retry, retry policy belongs to
    /// the storage adapter.
    #[error("storage error: {0}")]
    Storage(String),

    /// Optimistic concurrency conflict: the log grew between read and append.
    #[error("log length conflict: expected {expected}, found {actual}")]
    Conflict {
        /// Log length the caller observed when it read.
        expected: u64,
        /// Actual log length at append time.
        actual: u64,
    },

    /// A stored row failed to decode. This is data corruption, not a user
    /// mistake, and must fail the whole read.
    #[error("corrupted event row: {0}")]
    Corrupted(#[from] CodecError),
}

/// Filter for [`EventLog::events`]: by event type set and/or exact field
/// equality. An empty filter matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Match only these event types, when set.
    pub types: Option<Vec<EventType>>,
    /// Match only events referring to this order date, when set.
    pub order_date: Option<OrderDate>,
    /// Match only events authored by this user, when set.
    pub author: Option<UserId>,
}

impl EventFilter {
    /// Filter by a set of event types.
    #[must_use]
    pub fn types(types: impl Into<Vec<EventType>>) -> Self {
        Self {
            types: Some(types.into()),
            ..Self::default()
        }
    }

    /// Restrict the filter to events referring to `date`.
    #[must_use]
    pub const fn with_order_date(mut self, date: OrderDate) -> Self {
        self.order_date = Some(date);
        self
    }

    /// Restrict the filter to events authored by `author`.
    #[must_use]
    pub fn with_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    /// Whether `event` satisfies every predicate of this filter.
    ///
    /// Shared by all backends so filtering semantics cannot drift between
    /// implementations.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(types) = &self.types {
            if !types.contains(&event.event_type()) {
                return false;
            }
        }
        if let Some(date) = self.order_date {
            if event.order_date() != Some(date) {
                return false;
            }
        }
        if let Some(author) = &self.author {
            if &event.author != author {
                return false;
            }
        }
        true
    }
}

/// Append-only, ordered event log.
///
/// Implementations must be `Send + Sync`; all operations are async
/// I/O-bound calls that may suspend. Once an append is issued it either
/// completes or fails; there is no cancellation or compensating rollback.
pub trait EventLog: Send + Sync {
    /// Durably appends one event at the end of the log.
    ///
    /// `expected_len` is the optimistic concurrency token: `Some(n)` makes
    /// the append fail with [`EventLogError::Conflict`] unless the log holds
    /// exactly `n` events; `None` appends unconditionally.
    ///
    /// # Errors
    ///
    /// - [`EventLogError::Conflict`]: the log changed since the caller read it
    /// - [`EventLogError::Storage`]: backend or transport failure
    fn append(
        &self,
        event: Event,
        expected_len: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventLogError>> + Send + '_>>;

    /// Returns matching events in log order (oldest first).
    ///
    /// An absent filter returns the full log. A log that has never been
    /// written to returns an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// - [`EventLogError::Storage`]: backend or transport failure
    /// - [`EventLogError::Corrupted`]: a stored row failed to decode
    fn events(
        &self,
        filter: Option<EventFilter>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Event>, EventLogError>> + Send + '_>>;
}

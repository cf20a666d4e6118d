//! # Burrito Club Testing
//!
//! Testing utilities for the burrito club ledger:
//!
//! - [`InMemoryEventLog`]: fast, deterministic event log that stores encoded
//!   rows (so every test also exercises the row codec)
//! - [`FailingEventLog`]: storage-failure double for error paths
//! - [`FixedClock`] / [`test_clock`]: deterministic time
//! - [`SequentialIdGenerator`]: predictable event ids
//! - [`helpers::test_service`]: a fully wired `OrderService` over the
//!   in-memory log

pub mod mocks;

pub use mocks::{test_clock, FailingEventLog, FixedClock, InMemoryEventLog, SequentialIdGenerator};

/// Test helpers and builders.
pub mod helpers {
    use crate::mocks::{test_clock, InMemoryEventLog, SequentialIdGenerator};
    use burrito_club_core::service::OrderService;
    use std::sync::Arc;

    /// A fully wired order service over a fresh in-memory log, with a fixed
    /// clock and sequential ids. Returns the log too so tests can inspect
    /// or seed the raw rows.
    #[must_use]
    pub fn test_service() -> (OrderService, Arc<InMemoryEventLog>) {
        let log = Arc::new(InMemoryEventLog::new());
        let service = OrderService::new(
            log.clone(),
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
        );
        (service, log)
    }
}

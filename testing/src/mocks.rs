//! Mock implementations of the core environment and storage traits.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use burrito_club_core::codec;
use burrito_club_core::environment::{Clock, IdGenerator};
use burrito_club_core::event::{Event, EventId};
use burrito_club_core::event_log::{EventFilter, EventLog, EventLogError};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory event log for fast, deterministic testing.
///
/// Stores the **encoded rows**, not the events, exactly like a row-oriented
/// production backend would. Every append and read goes through the codec,
/// so round-trip fidelity is exercised by every test that touches the log.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventLog {
    rows: Arc<RwLock<Vec<Vec<String>>>>,
}

impl InMemoryEventLog {
    /// Create a new empty in-memory event log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log pre-seeded with raw rows (useful for corruption tests).
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Snapshot of the raw stored rows, for assertions.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.rows.read().unwrap().clone()
    }

    /// Clear all rows (for test isolation).
    pub fn clear(&self) {
        self.rows.write().unwrap().clear();
    }
}

impl EventLog for InMemoryEventLog {
    fn append(
        &self,
        event: Event,
        expected_len: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventLogError>> + Send + '_>> {
        Box::pin(async move {
            let mut rows = self.rows.write().unwrap();
            if let Some(expected) = expected_len {
                let actual = u64::try_from(rows.len()).unwrap();
                if actual != expected {
                    return Err(EventLogError::Conflict { expected, actual });
                }
            }
            rows.push(codec::to_row(&event));
            Ok(())
        })
    }

    fn events(
        &self,
        filter: Option<EventFilter>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Event>, EventLogError>> + Send + '_>> {
        Box::pin(async move {
            let rows = self.rows.read().unwrap().clone();
            let mut events = Vec::with_capacity(rows.len());
            for row in &rows {
                let event = codec::from_row(row)?;
                if filter.as_ref().map_or(true, |f| f.matches(&event)) {
                    events.push(event);
                }
            }
            Ok(events)
        })
    }
}

/// Event log double whose every operation fails with a storage error.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingEventLog;

impl EventLog for FailingEventLog {
    fn append(
        &self,
        _event: Event,
        _expected_len: Option<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventLogError>> + Send + '_>> {
        Box::pin(async { Err(EventLogError::Storage("backend unavailable".to_string())) })
    }

    fn events(
        &self,
        _filter: Option<EventFilter>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Event>, EventLogError>> + Send + '_>> {
        Box::pin(async { Err(EventLogError::Storage("backend unavailable".to_string())) })
    }
}

/// Fixed clock for deterministic tests; always returns the same time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time.
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2019-01-01 00:00:00 UTC).
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2019-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

/// Predictable id generator: `event-1`, `event-2`, ...
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a new generator starting at `event-1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> EventId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        EventId::new(format!("event-{n}"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use burrito_club_core::event::EventPayload;
    use burrito_club_core::event::EventType;
    use burrito_club_core::types::UserId;

    fn open_event(id: &str, date: &str) -> Event {
        Event::new(
            EventId::new(id),
            test_clock().now(),
            UserId::from("U1337"),
            EventPayload::OpenOrder {
                date: date.parse().expect("valid date"),
            },
        )
    }

    fn close_event(id: &str, date: &str) -> Event {
        Event::new(
            EventId::new(id),
            test_clock().now(),
            UserId::from("U1337"),
            EventPayload::CloseOrder {
                date: date.parse().expect("valid date"),
            },
        )
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let log = InMemoryEventLog::new();
        log.append(open_event("e1", "2019-01-01"), None).await.unwrap();
        log.append(open_event("e2", "2019-01-02"), None).await.unwrap();

        let events = log.events(None).await.unwrap();
        assert_eq!(events[0].id, EventId::new("e1"));
        assert_eq!(events[1].id, EventId::new("e2"));
    }

    #[tokio::test]
    async fn append_checks_the_concurrency_token() {
        let log = InMemoryEventLog::new();
        log.append(open_event("e1", "2019-01-01"), Some(0)).await.unwrap();

        // A stale writer that read an empty log is rejected.
        let result = log.append(open_event("e2", "2019-01-02"), Some(0)).await;
        assert!(matches!(
            result,
            Err(EventLogError::Conflict { expected: 0, actual: 1 })
        ));

        // An unconditional append still succeeds.
        log.append(open_event("e3", "2019-01-03"), None).await.unwrap();
        assert_eq!(log.rows().len(), 2);
    }

    #[tokio::test]
    async fn events_filters_by_type() {
        let log = InMemoryEventLog::new();
        log.append(open_event("e1", "2019-01-01"), None).await.unwrap();
        log.append(close_event("e2", "2019-01-01"), None).await.unwrap();

        let filter = EventFilter::types([EventType::CloseOrder]);
        let events = log.events(Some(filter)).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, EventId::new("e2"));
    }

    #[tokio::test]
    async fn corrupted_row_fails_the_whole_read() {
        let log = InMemoryEventLog::from_rows(vec![vec![
            "id".to_string(),
            "2019-01-01T00:00:00.000Z".to_string(),
            "mystery_event".to_string(),
            "1".to_string(),
            "U1".to_string(),
        ]]);

        let result = log.events(None).await;
        assert!(matches!(result, Err(EventLogError::Corrupted(_))));
    }

    #[tokio::test]
    async fn failing_log_fails_everything() {
        let log = FailingEventLog;
        assert!(log.events(None).await.is_err());
        assert!(log
            .append(open_event("e1", "2019-01-01"), None)
            .await
            .is_err());
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn sequential_ids_are_predictable() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.generate(), EventId::new("event-1"));
        assert_eq!(ids.generate(), EventId::new("event-2"));
    }
}

//! Domain events: the immutable facts the whole system is derived from.
//!
//! An [`Event`] is a common envelope (`id`, `timestamp`, `version`, `author`)
//! around a closed [`EventPayload`] sum type. Events are appended to the
//! [`EventLog`](crate::event_log::EventLog) and never mutated; every read
//! model is a pure fold over the event sequence.

use crate::types::{Drink, Filling, ItemType, Money, OrderDate, Sauce, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version stamped on every newly created event.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Opaque unique identifier of an event (a UUID in production).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    /// Creates an `EventId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of event kinds, with their canonical wire tags.
///
/// The historical store carried both `open_order` and `openOrder` spellings;
/// the snake_case tags are canonical here and the only ones decoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// An order window was opened for a date.
    OpenOrder,
    /// An order window was closed.
    CloseOrder,
    /// Somebody put an item into an open order.
    AddOrderItem,
    /// A payment was recorded against someone's balance.
    ReceivePayment,
}

impl EventType {
    /// Stable wire tag stored in the event row.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenOrder => "open_order",
            Self::CloseOrder => "close_order",
            Self::AddOrderItem => "add_order_item",
            Self::ReceivePayment => "receive_payment",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Variant-specific event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// An order window was opened; `date` is the order's unique business key.
    OpenOrder {
        /// Calendar date identifying the order.
        date: OrderDate,
    },

    /// The order window for `date` was closed. Terminal: no further
    /// transitions exist for that date.
    CloseOrder {
        /// Calendar date identifying the order.
        date: OrderDate,
    },

    /// An item was added to the order opened for `order_date`.
    AddOrderItem {
        /// Date of the order this item belongs to.
        order_date: OrderDate,
        /// What was ordered.
        item_type: ItemType,
        /// Filling choice.
        filling: Filling,
        /// Sauce number.
        sauce: Sauce,
        /// Drink choice, only meaningful for item types that include one.
        drink: Option<Drink>,
        /// Free-form comments passed through to the shop.
        comments: String,
    },

    /// A payment was received. Recorded unconditionally; payments may
    /// overpay or underpay any outstanding balance.
    ReceivePayment {
        /// Whose balance the payment credits.
        sender: UserId,
        /// Amount in minor currency units.
        amount: Money,
        /// Payment channel, e.g. `"bank_transfer"`.
        payment_type: String,
        /// Free-form comments.
        comments: String,
    },
}

impl EventPayload {
    /// Returns the [`EventType`] tag of this payload.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::OpenOrder { .. } => EventType::OpenOrder,
            Self::CloseOrder { .. } => EventType::CloseOrder,
            Self::AddOrderItem { .. } => EventType::AddOrderItem,
            Self::ReceivePayment { .. } => EventType::ReceivePayment,
        }
    }
}

/// An immutable fact appended to the event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique, opaque event identifier.
    pub id: EventId,
    /// Creation instant; encoded as RFC 3339 with millisecond precision.
    pub timestamp: DateTime<Utc>,
    /// Schema version of the row encoding (currently always 1).
    pub version: u32,
    /// The user whose command produced this event.
    pub author: UserId,
    /// Variant-specific data.
    pub payload: EventPayload,
}

impl Event {
    /// Creates an event at the current schema version.
    #[must_use]
    pub const fn new(
        id: EventId,
        timestamp: DateTime<Utc>,
        author: UserId,
        payload: EventPayload,
    ) -> Self {
        Self {
            id,
            timestamp,
            version: EVENT_SCHEMA_VERSION,
            author,
            payload,
        }
    }

    /// Returns the [`EventType`] tag of this event.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        self.payload.event_type()
    }

    /// Returns the order date this event refers to, if any.
    ///
    /// `OpenOrder`/`CloseOrder` expose their `date`, `AddOrderItem` its
    /// `order_date`; payments are not tied to an order.
    #[must_use]
    pub const fn order_date(&self) -> Option<OrderDate> {
        match &self.payload {
            EventPayload::OpenOrder { date } | EventPayload::CloseOrder { date } => Some(*date),
            EventPayload::AddOrderItem { order_date, .. } => Some(*order_date),
            EventPayload::ReceivePayment { .. } => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} by {}", self.event_type(), self.id, self.author)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    fn open_event(date: &str) -> Event {
        Event::new(
            EventId::new("evt-1"),
            Utc::now(),
            UserId::from("U1337"),
            EventPayload::OpenOrder {
                date: date.parse().unwrap(),
            },
        )
    }

    #[test]
    fn event_type_tags_are_canonical_snake_case() {
        assert_eq!(EventType::OpenOrder.as_str(), "open_order");
        assert_eq!(EventType::CloseOrder.as_str(), "close_order");
        assert_eq!(EventType::AddOrderItem.as_str(), "add_order_item");
        assert_eq!(EventType::ReceivePayment.as_str(), "receive_payment");
    }

    #[test]
    fn new_event_carries_current_schema_version() {
        let event = open_event("2019-01-01");
        assert_eq!(event.version, EVENT_SCHEMA_VERSION);
        assert_eq!(event.event_type(), EventType::OpenOrder);
    }

    #[test]
    fn order_date_is_exposed_for_order_events_only() {
        let event = open_event("2019-01-01");
        assert_eq!(event.order_date(), Some("2019-01-01".parse().unwrap()));

        let payment = Event::new(
            EventId::new("evt-2"),
            Utc::now(),
            UserId::from("U1337"),
            EventPayload::ReceivePayment {
                sender: UserId::from("U42"),
                amount: crate::types::Money::from_minor(4242),
                payment_type: "bank_transfer".to_string(),
                comments: String::new(),
            },
        );
        assert_eq!(payment.order_date(), None);
    }
}

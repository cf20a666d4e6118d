//! Read-model projections: pure, stateless functions folding an event
//! sequence into views.
//!
//! Every function here takes a snapshot of the log (`&[Event]`) and has no
//! side effects, so it is safe to call repeatedly: the service re-derives
//! whatever it needs on every command.
//!
//! Duplicate `OpenOrder` events for one date should be prevented by the
//! service layer, but the projections tolerate them: the **first**
//! occurrence wins for id/author attribution, and the date counts as closed
//! if any `CloseOrder` for it exists.

use crate::event::{Event, EventPayload};
use crate::order::{Order, OrderItem, Payment};
use crate::types::{OrderDate, UserId};
use std::collections::HashSet;

/// A still-open order window, as seen by the `OpenOrder` event that opened it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenedOrder {
    /// Id of the opening event.
    pub id: crate::event::EventId,
    /// Who opened the order.
    pub author: UserId,
    /// The order's date.
    pub date: OrderDate,
}

/// All orders that are currently open: `OpenOrder` events whose date has no
/// matching `CloseOrder`, in log order, first occurrence per date.
#[must_use]
pub fn open_orders(events: &[Event]) -> Vec<OpenedOrder> {
    let closed_dates = close_dates(events);

    let mut seen = HashSet::new();
    events
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::OpenOrder { date }
                if !closed_dates.contains(date) && seen.insert(*date) =>
            {
                Some(OpenedOrder {
                    id: event.id.clone(),
                    author: event.author.clone(),
                    date: *date,
                })
            },
            _ => None,
        })
        .collect()
}

/// Materializes the order for `date`, or `None` when no `OpenOrder` event
/// with that date exists (not-found, not an error).
#[must_use]
pub fn order_by_date(events: &[Event], date: OrderDate) -> Option<Order> {
    let open_event = events.iter().find(
        |event| matches!(&event.payload, EventPayload::OpenOrder { date: d } if *d == date),
    )?;

    Some(Order {
        id: open_event.id.clone(),
        date,
        is_closed: close_dates(events).contains(&date),
        items: items_for_date(events, date),
    })
}

/// All orders whose date appears in both the open and close sets, each
/// materialized with its items, in open-event log order.
#[must_use]
pub fn closed_orders(events: &[Event]) -> Vec<Order> {
    let closed_dates = close_dates(events);

    let mut seen = HashSet::new();
    events
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::OpenOrder { date }
                if closed_dates.contains(date) && seen.insert(*date) =>
            {
                Some(Order {
                    id: event.id.clone(),
                    date: *date,
                    is_closed: true,
                    items: items_for_date(events, *date),
                })
            },
            _ => None,
        })
        .collect()
}

/// All items added to the order for `date`, in log order.
#[must_use]
pub fn items_for_date(events: &[Event], date: OrderDate) -> Vec<OrderItem> {
    events
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::AddOrderItem {
                order_date,
                item_type,
                filling,
                sauce,
                drink,
                comments,
            } if *order_date == date => Some(OrderItem {
                id: event.id.clone(),
                author: event.author.clone(),
                item_type: *item_type,
                filling: *filling,
                sauce: *sauce,
                drink: *drink,
                comments: comments.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// All recorded payments, in log order.
#[must_use]
pub fn payments(events: &[Event]) -> Vec<Payment> {
    events
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::ReceivePayment {
                sender,
                amount,
                payment_type,
                comments,
            } => Some(Payment {
                id: event.id.clone(),
                sender: sender.clone(),
                amount: *amount,
                payment_type: payment_type.clone(),
                comments: comments.clone(),
                author: event.author.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Dates for which any `CloseOrder` event exists.
fn close_dates(events: &[Event]) -> HashSet<OrderDate> {
    events
        .iter()
        .filter_map(|event| match &event.payload {
            EventPayload::CloseOrder { date } => Some(*date),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::event::{EventId, EventPayload};
    use crate::types::{Filling, ItemType, Money, Sauce};
    use chrono::Utc;

    fn event(id: &str, author: &str, payload: EventPayload) -> Event {
        Event::new(EventId::new(id), Utc::now(), UserId::from(author), payload)
    }

    fn open(id: &str, author: &str, date: &str) -> Event {
        event(id, author, EventPayload::OpenOrder { date: date.parse().unwrap() })
    }

    fn close(id: &str, author: &str, date: &str) -> Event {
        event(id, author, EventPayload::CloseOrder { date: date.parse().unwrap() })
    }

    fn add_item(id: &str, author: &str, date: &str) -> Event {
        event(
            id,
            author,
            EventPayload::AddOrderItem {
                order_date: date.parse().unwrap(),
                item_type: ItemType::BigBurrito,
                filling: Filling::Beef,
                sauce: Sauce::new(1).unwrap(),
                drink: None,
                comments: String::new(),
            },
        )
    }

    #[test]
    fn open_orders_excludes_closed_dates() {
        let events = vec![
            open("e1", "U1", "2019-01-01"),
            open("e2", "U2", "2019-01-02"),
            close("e3", "U1", "2019-01-01"),
        ];

        let opened = open_orders(&events);
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].date, "2019-01-02".parse().unwrap());
        assert_eq!(opened[0].author, UserId::from("U2"));
    }

    #[test]
    fn open_orders_preserves_log_order() {
        let events = vec![
            open("e1", "U1", "2019-01-02"),
            open("e2", "U2", "2019-01-01"),
        ];
        let opened = open_orders(&events);
        assert_eq!(opened[0].date, "2019-01-02".parse().unwrap());
        assert_eq!(opened[1].date, "2019-01-01".parse().unwrap());
    }

    #[test]
    fn duplicate_open_attributes_to_first_occurrence() {
        let events = vec![
            open("e1", "U1", "2019-01-01"),
            open("e2", "U2", "2019-01-01"),
        ];
        let opened = open_orders(&events);
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].author, UserId::from("U1"));
        assert_eq!(opened[0].id, EventId::new("e1"));
    }

    #[test]
    fn duplicate_open_still_closes_on_any_close() {
        let events = vec![
            open("e1", "U1", "2019-01-01"),
            open("e2", "U2", "2019-01-01"),
            close("e3", "U3", "2019-01-01"),
        ];
        assert!(open_orders(&events).is_empty());
        assert_eq!(closed_orders(&events).len(), 1);
    }

    #[test]
    fn order_by_date_materializes_items_in_log_order() {
        let events = vec![
            open("e1", "U1", "2019-01-01"),
            add_item("e2", "U2", "2019-01-01"),
            add_item("e3", "U3", "2019-01-01"),
            add_item("e4", "U4", "2019-01-02"), // other date, ignored
        ];

        let order = order_by_date(&events, "2019-01-01".parse().unwrap()).unwrap();
        assert_eq!(order.id, EventId::new("e1"));
        assert!(!order.is_closed);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].author, UserId::from("U2"));
        assert_eq!(order.items[1].author, UserId::from("U3"));
    }

    #[test]
    fn order_by_date_is_none_for_unknown_date() {
        let events = vec![open("e1", "U1", "2019-01-01")];
        assert!(order_by_date(&events, "2019-01-02".parse().unwrap()).is_none());
    }

    #[test]
    fn order_by_date_marks_closed_orders() {
        let events = vec![open("e1", "U1", "2019-01-01"), close("e2", "U1", "2019-01-01")];
        let order = order_by_date(&events, "2019-01-01".parse().unwrap()).unwrap();
        assert!(order.is_closed);
    }

    #[test]
    fn closed_orders_requires_both_open_and_close() {
        let events = vec![
            open("e1", "U1", "2019-01-01"),
            close("e2", "U1", "2019-01-01"),
            open("e3", "U1", "2019-01-02"),
            close("e4", "U4", "2019-01-03"), // close without open
            add_item("e5", "U2", "2019-01-01"),
        ];

        let closed = closed_orders(&events);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].date, "2019-01-01".parse().unwrap());
        assert_eq!(closed[0].items.len(), 1);
    }

    #[test]
    fn payments_are_projected_with_their_recorder() {
        let events = vec![event(
            "e1",
            "U1337",
            EventPayload::ReceivePayment {
                sender: UserId::from("U42"),
                amount: Money::from_minor(4242),
                payment_type: "bank_transfer".to_string(),
                comments: "No comments...".to_string(),
            },
        )];

        let projected = payments(&events);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].sender, UserId::from("U42"));
        assert_eq!(projected[0].author, UserId::from("U1337"));
        assert_eq!(projected[0].amount, Money::from_minor(4242));
    }
}

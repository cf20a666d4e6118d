//! Flat row encoding of events for row-oriented backing stores.
//!
//! Every event encodes to an ordered list of strings whose first four fields
//! are always `[id, timestamp, eventType, version]`; the remainder is
//! variant-specific:
//!
//! - `open_order` / `close_order`: `[author, date]`
//! - `add_order_item`: `[author, orderDate, type, filling, sauce, drink, comments]`
//!   (an absent drink encodes as the empty string)
//! - `receive_payment`: `[author, sender, amount, type, comments]`
//!
//! Timestamps are RFC 3339 with millisecond precision; `from_row(to_row(e))`
//! reconstructs `e` exactly for any event whose timestamp carries at most
//! millisecond precision (the [`Clock`](crate::environment::Clock)
//! implementations guarantee this).
//!
//! Decoding failures are data corruption, not user mistakes: they surface as
//! [`CodecError`] and must never be silently skipped by a backend.

use crate::event::{Event, EventId, EventPayload, EventType};
use crate::types::{ParseValueError, UserId};
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Errors raised while decoding an event row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The row's type tag matches no known event type.
    #[error("unknown event type tag: {0:?}")]
    UnknownEventType(String),

    /// The row has the wrong number of fields or an unparseable common field.
    #[error("malformed event row: {0}")]
    MalformedRow(String),

    /// A variant-specific field failed to parse.
    #[error("invalid field in event row: {0}")]
    InvalidField(#[from] ParseValueError),
}

/// Encodes an event into its flat row representation.
#[must_use]
pub fn to_row(event: &Event) -> Vec<String> {
    let mut row = vec![
        event.id.as_str().to_string(),
        event
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        event.event_type().as_str().to_string(),
        event.version.to_string(),
        event.author.as_str().to_string(),
    ];

    match &event.payload {
        EventPayload::OpenOrder { date } | EventPayload::CloseOrder { date } => {
            row.push(date.to_string());
        },
        EventPayload::AddOrderItem {
            order_date,
            item_type,
            filling,
            sauce,
            drink,
            comments,
        } => {
            row.push(order_date.to_string());
            row.push(item_type.as_str().to_string());
            row.push(filling.as_str().to_string());
            row.push(sauce.to_string());
            row.push(drink.map_or_else(String::new, |d| d.as_str().to_string()));
            row.push(comments.clone());
        },
        EventPayload::ReceivePayment {
            sender,
            amount,
            payment_type,
            comments,
        } => {
            row.push(sender.as_str().to_string());
            row.push(amount.minor().to_string());
            row.push(payment_type.clone());
            row.push(comments.clone());
        },
    }

    row
}

/// Decodes an event from its flat row representation.
///
/// # Errors
///
/// Returns [`CodecError`] when the row is shorter than its variant requires,
/// carries an unknown type tag, or contains an unparseable field.
pub fn from_row(row: &[String]) -> Result<Event, CodecError> {
    let [id, timestamp, event_type, version, author, rest @ ..] = row else {
        return Err(CodecError::MalformedRow(format!(
            "expected at least 5 fields, got {}",
            row.len()
        )));
    };

    let timestamp = parse_timestamp(timestamp)?;
    let version: u32 = version
        .parse()
        .map_err(|_| CodecError::MalformedRow(format!("bad version field: {version:?}")))?;
    let author = UserId::new(author.clone());

    let payload = match event_type.as_str() {
        "open_order" => EventPayload::OpenOrder {
            date: field(rest, 0, "date")?.parse()?,
        },
        "close_order" => EventPayload::CloseOrder {
            date: field(rest, 0, "date")?.parse()?,
        },
        "add_order_item" => EventPayload::AddOrderItem {
            order_date: field(rest, 0, "orderDate")?.parse()?,
            item_type: field(rest, 1, "type")?.parse()?,
            filling: field(rest, 2, "filling")?.parse()?,
            sauce: field(rest, 3, "sauce")?.parse()?,
            drink: match field(rest, 4, "drink")?.as_str() {
                "" => None,
                drink => Some(drink.parse()?),
            },
            comments: field(rest, 5, "comments")?.clone(),
        },
        "receive_payment" => EventPayload::ReceivePayment {
            sender: UserId::new(field(rest, 0, "sender")?.clone()),
            amount: field(rest, 1, "amount")?.parse()?,
            payment_type: field(rest, 2, "type")?.clone(),
            comments: field(rest, 3, "comments")?.clone(),
        },
        unknown => return Err(CodecError::UnknownEventType(unknown.to_string())),
    };

    Ok(Event {
        id: EventId::new(id.clone()),
        timestamp,
        version,
        author,
        payload,
    })
}

/// Reads the type tag of an encoded row without decoding the whole event.
///
/// # Errors
///
/// Returns [`CodecError`] when the tag field is missing or unknown.
pub fn row_event_type(row: &[String]) -> Result<EventType, CodecError> {
    let tag = row
        .get(2)
        .ok_or_else(|| CodecError::MalformedRow("missing event type field".to_string()))?;
    match tag.as_str() {
        "open_order" => Ok(EventType::OpenOrder),
        "close_order" => Ok(EventType::CloseOrder),
        "add_order_item" => Ok(EventType::AddOrderItem),
        "receive_payment" => Ok(EventType::ReceivePayment),
        unknown => Err(CodecError::UnknownEventType(unknown.to_string())),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CodecError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| CodecError::MalformedRow(format!("bad timestamp field: {raw:?}")))
}

fn field<'a>(rest: &'a [String], index: usize, name: &str) -> Result<&'a String, CodecError> {
    rest.get(index)
        .ok_or_else(|| CodecError::MalformedRow(format!("missing {name} field")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::types::{Drink, Filling, ItemType, Money, Sauce};
    use chrono::TimeZone;

    fn millis_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 1, 1, 12, 30, 45).unwrap() + chrono::Duration::milliseconds(123)
    }

    fn sample(payload: EventPayload) -> Event {
        Event::new(
            EventId::new("b7e9"),
            millis_timestamp(),
            UserId::from("U1337"),
            payload,
        )
    }

    #[test]
    fn open_order_round_trips() {
        let event = sample(EventPayload::OpenOrder {
            date: "2019-01-01".parse().unwrap(),
        });
        let row = to_row(&event);
        assert_eq!(row[2], "open_order");
        assert_eq!(row.len(), 6);
        assert_eq!(from_row(&row).unwrap(), event);
    }

    #[test]
    fn close_order_round_trips() {
        let event = sample(EventPayload::CloseOrder {
            date: "2019-01-02".parse().unwrap(),
        });
        assert_eq!(from_row(&to_row(&event)).unwrap(), event);
    }

    #[test]
    fn add_order_item_round_trips_with_drink() {
        let event = sample(EventPayload::AddOrderItem {
            order_date: "2019-01-01".parse().unwrap(),
            item_type: ItemType::BigBurrito,
            filling: Filling::Beef,
            sauce: Sauce::new(4).unwrap(),
            drink: Some(Drink::Mangolade),
            comments: "short comment".to_string(),
        });
        let row = to_row(&event);
        assert_eq!(row.len(), 11);
        assert_eq!(from_row(&row).unwrap(), event);
    }

    #[test]
    fn absent_drink_encodes_as_empty_string() {
        let event = sample(EventPayload::AddOrderItem {
            order_date: "2019-01-01".parse().unwrap(),
            item_type: ItemType::SmallBurrito,
            filling: Filling::Chicken,
            sauce: Sauce::new(6).unwrap(),
            drink: None,
            comments: String::new(),
        });
        let row = to_row(&event);
        assert_eq!(row[9], "");
        assert_eq!(from_row(&row).unwrap(), event);
    }

    #[test]
    fn receive_payment_round_trips() {
        let event = sample(EventPayload::ReceivePayment {
            sender: UserId::from("U42"),
            amount: Money::from_minor(4242),
            payment_type: "bank_transfer".to_string(),
            comments: "No comments...".to_string(),
        });
        let row = to_row(&event);
        assert_eq!(row[6], "4242");
        assert_eq!(from_row(&row).unwrap(), event);
    }

    #[test]
    fn unknown_tag_is_rejected_loudly() {
        let event = sample(EventPayload::OpenOrder {
            date: "2019-01-01".parse().unwrap(),
        });
        let mut row = to_row(&event);
        row[2] = "openOrder".to_string(); // historical camelCase spelling
        assert!(matches!(
            from_row(&row),
            Err(CodecError::UnknownEventType(tag)) if tag == "openOrder"
        ));
    }

    #[test]
    fn truncated_row_is_rejected() {
        let event = sample(EventPayload::AddOrderItem {
            order_date: "2019-01-01".parse().unwrap(),
            item_type: ItemType::Quesadilla,
            filling: Filling::Pork,
            sauce: Sauce::new(1).unwrap(),
            drink: None,
            comments: String::new(),
        });
        let mut row = to_row(&event);
        row.truncate(8);
        assert!(matches!(from_row(&row), Err(CodecError::MalformedRow(_))));
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let row = vec![
            "id".to_string(),
            "not-a-timestamp".to_string(),
            "open_order".to_string(),
            "1".to_string(),
            "U1".to_string(),
            "2019-01-01".to_string(),
        ];
        assert!(matches!(from_row(&row), Err(CodecError::MalformedRow(_))));
    }

    #[test]
    fn row_event_type_reads_the_tag_only() {
        let event = sample(EventPayload::CloseOrder {
            date: "2019-01-01".parse().unwrap(),
        });
        assert_eq!(row_event_type(&to_row(&event)).unwrap(), EventType::CloseOrder);
    }
}

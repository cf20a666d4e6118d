//! Order service: the command-handling façade over the event log.
//!
//! Each command re-reads the log, validates preconditions against the
//! projections, and appends exactly one event. The append carries the log
//! length observed at read time as an optimistic-concurrency token, so two
//! racing commands cannot both pass validation and both append (one gets
//! [`EventLogError::Conflict`]).
//!
//! State machine per order date: `UNOPENED -> OPEN -> CLOSED`, `CLOSED`
//! terminal. Validation failures are typed [`ServiceError`] values, never
//! panics.

use crate::environment::{Clock, IdGenerator};
use crate::event::{Event, EventPayload};
use crate::event_log::{EventLog, EventLogError};
use crate::order::{Order, OrderItem, Payment};
use crate::projection::{self, OpenedOrder};
use crate::types::{Drink, Filling, ItemType, Money, OrderDate, Sauce, UserId};
use crate::{pricing, sms};
use std::sync::Arc;
use thiserror::Error;

/// Domain errors reported by the order service.
///
/// The first four variants are user-recoverable (duplicate open, missing
/// order, wrong open-order count) and map to friendly chat messages; `Log`
/// wraps storage failures and corruption, which fail the command.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// An order for this date was already opened (it may since have closed).
    #[error("an order for {date} already exists")]
    OrderAlreadyExists {
        /// The colliding date.
        date: OrderDate,
    },

    /// No order was ever opened for this date.
    #[error("no order found for {date}")]
    OrderNotFound {
        /// The date that matched nothing.
        date: OrderDate,
    },

    /// The order exists but its window is already closed.
    #[error("the order for {date} is already closed")]
    OrderAlreadyClosed {
        /// The date of the closed order.
        date: OrderDate,
    },

    /// Adding an item requires exactly one currently open order.
    #[error("requires exactly one order opened, found {open_count}")]
    ExactlyOneOrderRequired {
        /// How many orders were actually open.
        open_count: usize,
    },

    /// Event log failure (storage, conflict, or corruption).
    #[error(transparent)]
    Log(#[from] EventLogError),
}

impl ServiceError {
    /// Whether this error is a user mistake (as opposed to an
    /// infrastructure failure) and safe to echo back as a chat message.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::Log(_))
    }
}

/// The user-supplied part of a new order item; the service picks the order
/// date and generates the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderItemDraft {
    /// What is being ordered.
    pub item_type: ItemType,
    /// Filling choice.
    pub filling: Filling,
    /// Sauce number.
    pub sauce: Sauce,
    /// Drink choice; ignored for item types without one.
    pub drink: Option<Drink>,
    /// Free-form comments passed through to the shop.
    pub comments: String,
}

/// Command-handling façade over an injected [`EventLog`].
///
/// Owns no state of its own; every read model is re-derived from the log
/// on each call. Construct one per process with the production clock and id
/// generator, or with the deterministic test doubles from
/// `burrito-club-testing`.
pub struct OrderService {
    log: Arc<dyn EventLog>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl OrderService {
    /// Creates a service over the given log and environment.
    #[must_use]
    pub fn new(log: Arc<dyn EventLog>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { log, clock, ids }
    }

    /// Opens the order window for `date`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::OrderAlreadyExists`] when any order for `date` was
    /// ever opened; a duplicate open is a distinct reported outcome, not a
    /// success and not a crash. The original author is preserved.
    pub async fn open_order(&self, author: UserId, date: OrderDate) -> Result<(), ServiceError> {
        let events = self.log.events(None).await?;

        let already_opened = events.iter().any(
            |event| matches!(&event.payload, EventPayload::OpenOrder { date: d } if *d == date),
        );
        if already_opened {
            tracing::warn!(%date, %author, "rejected duplicate order open");
            return Err(ServiceError::OrderAlreadyExists { date });
        }

        let event = self.new_event(author, EventPayload::OpenOrder { date });
        self.append(event, events.len()).await?;
        tracing::info!(%date, "order opened");
        Ok(())
    }

    /// Closes the order window for `date`. Terminal: nothing can be added
    /// to or reopened for this date afterwards.
    ///
    /// # Errors
    ///
    /// [`ServiceError::OrderNotFound`] when no order was opened for `date`,
    /// [`ServiceError::OrderAlreadyClosed`] when it was already closed.
    pub async fn close_order(&self, author: UserId, date: OrderDate) -> Result<(), ServiceError> {
        let events = self.log.events(None).await?;

        let Some(order) = projection::order_by_date(&events, date) else {
            tracing::warn!(%date, "close requested for unknown order");
            return Err(ServiceError::OrderNotFound { date });
        };
        if order.is_closed {
            tracing::warn!(%date, "close requested for already closed order");
            return Err(ServiceError::OrderAlreadyClosed { date });
        }

        let event = self.new_event(author, EventPayload::CloseOrder { date });
        self.append(event, events.len()).await?;
        tracing::info!(%date, "order closed");
        Ok(())
    }

    /// Adds an item to the currently open order and returns the
    /// materialized [`OrderItem`] for echoing back to the user.
    ///
    /// # Errors
    ///
    /// [`ServiceError::ExactlyOneOrderRequired`] unless exactly one order is
    /// currently open; the item is tagged with that order's date.
    pub async fn add_order_item(
        &self,
        author: UserId,
        draft: OrderItemDraft,
    ) -> Result<OrderItem, ServiceError> {
        let events = self.log.events(None).await?;

        let open = projection::open_orders(&events);
        if open.len() != 1 {
            tracing::warn!(open_count = open.len(), "rejected order item");
            return Err(ServiceError::ExactlyOneOrderRequired {
                open_count: open.len(),
            });
        }
        let order_date = open[0].date;

        // Drinks only come with the big variants; quietly drop the rest.
        let drink = draft.drink.filter(|_| draft.item_type.includes_drink());

        let event = self.new_event(
            author.clone(),
            EventPayload::AddOrderItem {
                order_date,
                item_type: draft.item_type,
                filling: draft.filling,
                sauce: draft.sauce,
                drink,
                comments: draft.comments.clone(),
            },
        );
        let item = OrderItem {
            id: event.id.clone(),
            author,
            item_type: draft.item_type,
            filling: draft.filling,
            sauce: draft.sauce,
            drink,
            comments: draft.comments,
        };
        self.append(event, events.len()).await?;
        tracing::info!(%order_date, item_type = %item.item_type, "order item added");
        Ok(item)
    }

    /// Records a payment. Appended unconditionally; payments may overpay or
    /// underpay any outstanding balance.
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Log`] on storage failure.
    pub async fn receive_payment(
        &self,
        author: UserId,
        sender: UserId,
        amount: Money,
        payment_type: String,
        comments: String,
    ) -> Result<Payment, ServiceError> {
        let event = self.new_event(
            author.clone(),
            EventPayload::ReceivePayment {
                sender: sender.clone(),
                amount,
                payment_type: payment_type.clone(),
                comments: comments.clone(),
            },
        );
        let payment = Payment {
            id: event.id.clone(),
            sender,
            amount,
            payment_type,
            comments,
            author,
        };
        // No precondition, so no concurrency token either.
        self.log.append(event, None).await?;
        tracing::info!(sender = %payment.sender, amount = %payment.amount, "payment received");
        Ok(payment)
    }

    /// All currently open orders, in log order.
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Log`] on storage failure.
    pub async fn open_orders(&self) -> Result<Vec<OpenedOrder>, ServiceError> {
        let events = self.log.events(None).await?;
        Ok(projection::open_orders(&events))
    }

    /// The single currently open order, materialized with its items, or
    /// `None` unless exactly one order is open.
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Log`] on storage failure.
    pub async fn current_order(&self) -> Result<Option<Order>, ServiceError> {
        let events = self.log.events(None).await?;
        let open = projection::open_orders(&events);
        match open.as_slice() {
            [only] => Ok(projection::order_by_date(&events, only.date)),
            _ => Ok(None),
        }
    }

    /// The materialized order for `date`, or `None` when no order was ever
    /// opened for it (not-found, not an error).
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Log`] on storage failure.
    pub async fn order_by_date(&self, date: OrderDate) -> Result<Option<Order>, ServiceError> {
        let events = self.log.events(None).await?;
        Ok(projection::order_by_date(&events, date))
    }

    /// All closed orders, materialized with their items.
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Log`] on storage failure.
    pub async fn closed_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let events = self.log.events(None).await?;
        Ok(projection::closed_orders(&events))
    }

    /// Net balance of `user`: payments made minus charges across all closed
    /// orders they participated in (item prices plus delivery share).
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Log`] on storage failure.
    pub async fn balance(&self, user: &UserId) -> Result<Money, ServiceError> {
        let events = self.log.events(None).await?;
        let closed = projection::closed_orders(&events);
        let payments = projection::payments(&events);
        Ok(pricing::balance_for(user, &closed, &payments))
    }

    /// SMS-ready summary of the order for `date`, or `None` when no order
    /// exists for that date.
    ///
    /// # Errors
    ///
    /// Only [`ServiceError::Log`] on storage failure.
    pub async fn sms_summary(
        &self,
        date: OrderDate,
        template: &str,
    ) -> Result<Option<String>, ServiceError> {
        let order = self.order_by_date(date).await?;
        Ok(order.map(|order| sms::summary(&order, template)))
    }

    fn new_event(&self, author: UserId, payload: EventPayload) -> Event {
        Event::new(self.ids.generate(), self.clock.now(), author, payload)
    }

    async fn append(&self, event: Event, observed_len: usize) -> Result<(), EventLogError> {
        let expected = u64::try_from(observed_len).unwrap_or(u64::MAX);
        self.log.append(event, Some(expected)).await
    }
}


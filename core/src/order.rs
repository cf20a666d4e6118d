//! Derived read-model entities: orders, order items, payments.
//!
//! None of these are persisted. They are materialized on demand from the
//! event log by [`crate::projection`], recomputed on every query and
//! discarded after each request.

use crate::event::EventId;
use crate::pricing;
use crate::types::{Drink, Filling, ItemType, Money, OrderDate, Sauce, UserId};
use serde::{Deserialize, Serialize};

/// One item somebody put into an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Id of the `AddOrderItem` event this item came from.
    pub id: EventId,
    /// Who ordered it.
    pub author: UserId,
    /// What was ordered.
    pub item_type: ItemType,
    /// Filling choice.
    pub filling: Filling,
    /// Sauce number.
    pub sauce: Sauce,
    /// Drink choice, if the item type includes one.
    pub drink: Option<Drink>,
    /// Free-form comments passed through to the shop.
    pub comments: String,
}

impl OrderItem {
    /// Price of this item, a pure function of its type (see
    /// [`pricing::item_price`]).
    #[must_use]
    pub const fn price(&self) -> Money {
        pricing::item_price(self.item_type)
    }
}

/// A materialized order: the `OpenOrder` event plus everything that was
/// added to it, and whether it has been closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Id of the `OpenOrder` event that opened this order.
    pub id: EventId,
    /// Calendar date, the order's unique business key.
    pub date: OrderDate,
    /// Whether a `CloseOrder` event exists for this date.
    pub is_closed: bool,
    /// Items in log order.
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Total price: sum of item prices plus the fixed delivery cost.
    #[must_use]
    pub fn price(&self) -> Money {
        self.items.iter().map(OrderItem::price).sum::<Money>() + pricing::DELIVERY_COST
    }

    /// Distinct item authors, deduplicated, in first-appearance order.
    #[must_use]
    pub fn participants(&self) -> Vec<UserId> {
        let mut participants: Vec<UserId> = Vec::new();
        for item in &self.items {
            if !participants.contains(&item.author) {
                participants.push(item.author.clone());
            }
        }
        participants
    }

    /// This order's per-participant share of the delivery cost.
    ///
    /// Zero when nobody ordered anything: there is no one to collect from.
    #[must_use]
    pub fn delivery_share(&self) -> Money {
        let count = self.participants().len();
        if count == 0 {
            Money::ZERO
        } else {
            pricing::delivery_share(pricing::DELIVERY_COST, count)
        }
    }
}

/// A recorded payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Id of the `ReceivePayment` event.
    pub id: EventId,
    /// Whose balance the payment credits.
    pub sender: UserId,
    /// Amount in minor currency units.
    pub amount: Money,
    /// Payment channel, e.g. `"bank_transfer"`.
    pub payment_type: String,
    /// Free-form comments.
    pub comments: String,
    /// Who recorded the payment.
    pub author: UserId,
}

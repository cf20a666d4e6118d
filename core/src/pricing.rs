//! Pricing rules: the fixed price table, delivery-cost apportionment, and
//! per-person balances.
//!
//! All arithmetic is exact integer math over minor currency units.

use crate::order::{Order, Payment};
use crate::types::{ItemType, Money, UserId};
use std::collections::HashMap;

/// Fixed delivery cost per order, split among participants.
pub const DELIVERY_COST: Money = Money::from_minor(720);

/// Price of an item, a pure function of its type.
///
/// `small_burrito` was 1410 in an early price list; 1440 is canonical.
#[must_use]
pub const fn item_price(item_type: ItemType) -> Money {
    match item_type {
        ItemType::BigBurrito => Money::from_minor(1710),
        ItemType::SmallBurrito => Money::from_minor(1440),
        ItemType::Quesadilla => Money::from_minor(1530),
        ItemType::DoubleQuesadilla => Money::from_minor(2160),
    }
}

/// Each participant's share of the delivery cost, rounded **up** to the
/// nearest 10 minor units so the collector is never short.
///
/// # Panics
///
/// This function never panics for `participants > 0`; callers guard the
/// zero-participant case (see [`Order::delivery_share`]).
#[must_use]
#[allow(clippy::cast_possible_wrap)] // participant counts are tiny
pub const fn delivery_share(delivery_cost: Money, participants: usize) -> Money {
    let cost = delivery_cost.minor();
    let n = participants as i64;
    // ceil(cost / 10 / n) * 10, in integer arithmetic
    Money::from_minor((cost + 10 * n - 1) / (10 * n) * 10)
}

/// Total charges per user across all closed orders: each participant owes
/// their delivery share plus the price of every item they ordered.
#[must_use]
pub fn total_order_charges(closed_orders: &[Order]) -> HashMap<UserId, Money> {
    let mut charges: HashMap<UserId, Money> = HashMap::new();
    for order in closed_orders {
        let share = order.delivery_share();
        for participant in order.participants() {
            let entry = charges.entry(participant).or_insert(Money::ZERO);
            *entry = *entry + share;
        }
        for item in &order.items {
            let entry = charges.entry(item.author.clone()).or_insert(Money::ZERO);
            *entry = *entry + item.price();
        }
    }
    charges
}

/// Total payments per sender.
#[must_use]
pub fn total_payments(payments: &[Payment]) -> HashMap<UserId, Money> {
    let mut totals: HashMap<UserId, Money> = HashMap::new();
    for payment in payments {
        let entry = totals.entry(payment.sender.clone()).or_insert(Money::ZERO);
        *entry = *entry + payment.amount;
    }
    totals
}

/// Net balance of `user`: payments made minus charges incurred. Negative
/// means the user owes the collector.
#[must_use]
pub fn balance_for(user: &UserId, closed_orders: &[Order], payments: &[Payment]) -> Money {
    let charges = total_order_charges(closed_orders)
        .remove(user)
        .unwrap_or(Money::ZERO);
    let paid = total_payments(payments).remove(user).unwrap_or(Money::ZERO);
    paid - charges
}

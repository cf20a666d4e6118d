//! SMS-ready order summary.
//!
//! The shop takes orders by text message, in Polish shorthand: one numbered
//! line per item plus the total price. Items are sorted by a composite score
//! so identical variants end up adjacent regardless of who ordered when.

use crate::order::{Order, OrderItem};
use crate::types::{Drink, Filling, ItemType};

/// Default summary template; `${date}`, `${items}` and `${price}` are the
/// supported placeholders.
pub const DEFAULT_TEMPLATE: &str = "${date}\n\n${items}\n\n${price}";

/// Composite sort score: type band, filling band, sauce number, drink band,
/// most significant first. Ascending order groups identical variants.
#[must_use]
pub fn sort_score(item: &OrderItem) -> u32 {
    let type_band: u32 = match item.item_type {
        ItemType::BigBurrito => 1,
        ItemType::SmallBurrito => 2,
        ItemType::Quesadilla => 3,
        ItemType::DoubleQuesadilla => 4,
    };
    let filling_band: u32 = match item.filling {
        Filling::Beef => 1,
        Filling::Pork => 2,
        Filling::Chicken => 3,
        Filling::Vegetables => 4,
    };
    let drink_band: u32 = match item.drink {
        None => 0,
        Some(Drink::Mangolade) => 1,
        Some(Drink::Lemonade) => 2,
    };
    type_band * 1000 + filling_band * 100 + u32::from(item.sauce.number()) * 10 + drink_band
}

/// One SMS line for an item, without its list number.
///
/// `D.` marks the big variants, `M.` the small ones; fillings and drinks use
/// the shop's Polish abbreviations. Drinkless items end after the sauce.
#[must_use]
pub fn item_line(item: &OrderItem) -> String {
    let size = if item.item_type.includes_drink() { "D" } else { "M" };
    let kind = match item.item_type {
        ItemType::BigBurrito | ItemType::SmallBurrito => "burrito",
        ItemType::Quesadilla | ItemType::DoubleQuesadilla => "quesadilla",
    };
    let filling = match item.filling {
        Filling::Beef => "wół",
        Filling::Pork => "wieprz",
        Filling::Chicken => "kura",
        Filling::Vegetables => "wege",
    };

    match item.drink {
        Some(drink) => {
            let drink = match drink {
                Drink::Mangolade => "mango",
                Drink::Lemonade => "lemon",
            };
            format!("{size}. {kind}, {filling}, {}, {drink}.", item.sauce)
        },
        None => format!("{size}. {kind}, {filling}, {}.", item.sauce),
    }
}

/// Renders the full SMS summary for an order into `template`.
///
/// Items are sorted by [`sort_score`] and numbered from 1; the price is the
/// order total in major units with a comma separator.
#[must_use]
pub fn summary(order: &Order, template: &str) -> String {
    let mut items: Vec<&OrderItem> = order.items.iter().collect();
    items.sort_by_key(|item| sort_score(item));

    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item_line(item)))
        .collect();

    template
        .replace("${date}", &order.date.to_string())
        .replace("${items}", &lines.join("\n"))
        .replace("${price}", &order.price().readable())
}

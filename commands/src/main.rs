//! Demo binary: drives a full order day against the in-memory event log.
//!
//! ```bash
//! SMS_TEMPLATE='${date}\n\n${items}\n\n${price}' cargo run --bin burrito-club
//! ```

use burrito_club_commands::{intent, CommandRouter, Config, PaymentSubmission};
use burrito_club_core::environment::{SystemClock, UuidIdGenerator};
use burrito_club_core::service::{OrderItemDraft, OrderService};
use burrito_club_core::types::{Drink, Filling, ItemType, Money, Sauce, UserId};
use burrito_club_testing::InMemoryEventLog;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let service = OrderService::new(
        Arc::new(InMemoryEventLog::new()),
        Arc::new(SystemClock),
        Arc::new(UuidIdGenerator),
    );
    let router = CommandRouter::new(service, Config::from_env()?);

    let alice = UserId::from("U-alice");
    let bob = UserId::from("U-bob");

    for (user, text) in [
        (&alice, "open new order 2019-01-01"),
        (&bob, "order"),
        (&alice, "show order"),
    ] {
        let response = router.dispatch(user, intent::parse(text)).await;
        info!(user = %user, command = text, "\n{}", response.text);
    }

    let draft = OrderItemDraft {
        item_type: ItemType::BigBurrito,
        filling: Filling::Beef,
        sauce: Sauce::new(1)?,
        drink: Some(Drink::Mangolade),
        comments: "extra spicy".to_string(),
    };
    let response = router.submit_order_item(&bob, draft).await;
    info!(user = %bob, "\n{}", response.text);

    let draft = OrderItemDraft {
        item_type: ItemType::SmallBurrito,
        filling: Filling::Chicken,
        sauce: Sauce::new(6)?,
        drink: None,
        comments: String::new(),
    };
    let response = router.submit_order_item(&alice, draft).await;
    info!(user = %alice, "\n{}", response.text);

    for (user, text) in [
        (&alice, "show order"),
        (&alice, "close order 2019-01-01"),
        (&alice, "get sms 2019-01-01"),
        (&bob, "balance"),
    ] {
        let response = router.dispatch(user, intent::parse(text)).await;
        info!(user = %user, command = text, "\n{}", response.text);
    }

    let response = router
        .submit_payment(
            &alice,
            PaymentSubmission {
                sender: bob.clone(),
                amount: Money::from_minor(4242),
                payment_type: "bank_transfer".to_string(),
                comments: "No comments...".to_string(),
            },
        )
        .await;
    info!(user = %bob, "\n{}", response.text);

    let response = router.dispatch(&bob, intent::parse("balance")).await;
    info!(user = %bob, "\n{}", response.text);

    Ok(())
}

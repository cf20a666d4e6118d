//! Command handlers.
//!
//! Every handler answers with a [`MessageResponse`]: a friendly chat
//! message, never a crash. Validation failures from the order service get a
//! command-specific hint; storage failures are logged and answered with a
//! generic apology.

use crate::config::Config;
use crate::intent::CommandIntent;
use burrito_club_core::order::{Order, OrderItem};
use burrito_club_core::service::{OrderItemDraft, OrderService, ServiceError};
use burrito_club_core::types::{Money, OrderDate, UserId};
use serde::Serialize;

/// The `{ text }` chat response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    /// The message shown to the user.
    pub text: String,
}

impl MessageResponse {
    /// Wraps a message text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A payment reported through the payment dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentSubmission {
    /// Who sent the money.
    pub sender: UserId,
    /// Amount in minor units.
    pub amount: Money,
    /// Free-form payment channel, e.g. `bank_transfer`.
    pub payment_type: String,
    /// Free-form comments.
    pub comments: String,
}

/// Routes parsed intents and dialog submissions to the order service.
pub struct CommandRouter {
    service: OrderService,
    config: Config,
}

impl CommandRouter {
    /// Creates a router over the given service.
    #[must_use]
    pub const fn new(service: OrderService, config: Config) -> Self {
        Self { service, config }
    }

    /// Handles a parsed `/burrito` slash command for `caller`.
    pub async fn dispatch(&self, caller: &UserId, intent: CommandIntent) -> MessageResponse {
        match intent {
            CommandIntent::Help => help_response(),
            CommandIntent::ShowButtons => self.show_buttons().await,
            CommandIntent::OpenNewOrder { date: None } => {
                wrong_or_missing_date_response("open new order")
            },
            CommandIntent::OpenNewOrder { date: Some(date) } => {
                self.open_new_order(caller, date).await
            },
            CommandIntent::CloseOrder { date: None } => {
                wrong_or_missing_date_response("close order")
            },
            CommandIntent::CloseOrder { date: Some(date) } => self.close_order(caller, date).await,
            CommandIntent::ShowOrder => self.show_order().await,
            CommandIntent::GetSms { date: None } => wrong_or_missing_date_response("get sms"),
            CommandIntent::GetSms { date: Some(date) } => self.get_sms(date).await,
            CommandIntent::Balance => self.balance(caller).await,
        }
    }

    /// Handles an item-dialog submission: adds the item to the currently
    /// open order and echoes it back.
    pub async fn submit_order_item(
        &self,
        caller: &UserId,
        draft: OrderItemDraft,
    ) -> MessageResponse {
        match self.service.add_order_item(caller.clone(), draft).await {
            Ok(item) => item_added_response(&item),
            Err(err) => error_response(&err),
        }
    }

    /// Handles a payment-dialog submission: records the payment and reports
    /// the sender's balance around it.
    pub async fn submit_payment(
        &self,
        caller: &UserId,
        submission: PaymentSubmission,
    ) -> MessageResponse {
        let before = match self.service.balance(&submission.sender).await {
            Ok(balance) => balance,
            Err(err) => return error_response(&err),
        };
        let payment = match self
            .service
            .receive_payment(
                caller.clone(),
                submission.sender.clone(),
                submission.amount,
                submission.payment_type,
                submission.comments,
            )
            .await
        {
            Ok(payment) => payment,
            Err(err) => return error_response(&err),
        };
        let after = match self.service.balance(&submission.sender).await {
            Ok(balance) => balance,
            Err(err) => return error_response(&err),
        };
        payment_received_response(payment.amount, before, after)
    }

    async fn show_buttons(&self) -> MessageResponse {
        match self.service.current_order().await {
            Ok(Some(_)) => order_buttons_response(),
            Ok(None) => no_opened_order_response(),
            Err(err) => error_response(&err),
        }
    }

    async fn open_new_order(&self, caller: &UserId, date: OrderDate) -> MessageResponse {
        match self.service.open_order(caller.clone(), date).await {
            Ok(()) => new_order_ok_response(date),
            Err(err) => error_response(&err),
        }
    }

    async fn close_order(&self, caller: &UserId, date: OrderDate) -> MessageResponse {
        match self.service.close_order(caller.clone(), date).await {
            Ok(()) => order_closed_response(date),
            Err(err) => error_response(&err),
        }
    }

    async fn show_order(&self) -> MessageResponse {
        match self.service.current_order().await {
            Ok(Some(order)) => show_order_response(&order),
            Ok(None) => no_opened_order_response(),
            Err(err) => error_response(&err),
        }
    }

    async fn get_sms(&self, date: OrderDate) -> MessageResponse {
        match self.service.sms_summary(date, &self.config.sms_template).await {
            Ok(Some(text)) => MessageResponse::new(text),
            Ok(None) => no_order_for_date_response(date),
            Err(err) => error_response(&err),
        }
    }

    async fn balance(&self, caller: &UserId) -> MessageResponse {
        match self.service.balance(caller).await {
            Ok(balance) => balance_response(balance),
            Err(err) => error_response(&err),
        }
    }
}

/// The help text, also used for anything unrecognized.
#[must_use]
pub fn help_response() -> MessageResponse {
    MessageResponse::new(
        "It seems you'd use some help. Please take a look on the list of available commands below:\n\
         - `/burrito order` will present you all current order options,\n\
         - `/burrito show order` lists all items of the current order,\n\
         - `/burrito open new order yyyy-mm-dd` opens a new order,\n\
         - `/burrito close order yyyy-mm-dd` closes an opened order,\n\
         - `/burrito get sms yyyy-mm-dd` prepares the SMS for the shop,\n\
         - `/burrito balance` shows your balance,\n\
         - `/burrito help` displays this message.",
    )
}

/// Answer when a command needs the single currently open order and there is
/// none (or more than one closed everything down to none).
#[must_use]
pub fn no_opened_order_response() -> MessageResponse {
    MessageResponse::new("There is no opened order. Ask somebody for help if needed.")
}

/// Answer when there is more than one opened order, which every
/// item-related command refuses to guess about.
#[must_use]
pub fn more_than_one_order_response() -> MessageResponse {
    MessageResponse::new("There is more than one opened order. Ask somebody for help if needed.")
}

/// The item-buttons prompt. Button rendering itself happens in the chat
/// surface; the text is all the core carries.
#[must_use]
pub fn order_buttons_response() -> MessageResponse {
    MessageResponse::new("Choose your destiny :burrito: :fiestaparrot:")
}

/// Hint for a date-taking command with a missing or malformed date.
#[must_use]
pub fn wrong_or_missing_date_response(command: &str) -> MessageResponse {
    MessageResponse::new(format!(
        "It looks like the date is wrong or missing. Required format: `/burrito {command} yyyy-mm-dd`."
    ))
}

/// Confirmation for a freshly opened order.
#[must_use]
pub fn new_order_ok_response(date: OrderDate) -> MessageResponse {
    MessageResponse::new(format!(
        ":white_check_mark: New order for {date} opened. Happy ordering! :burrito:"
    ))
}

/// Rejection when an order for the date already exists.
#[must_use]
pub fn new_order_date_colliding_response(date: OrderDate) -> MessageResponse {
    MessageResponse::new(format!(
        ":x: An order for {date} already exists. Pick another date."
    ))
}

/// Confirmation for a closed order.
#[must_use]
pub fn order_closed_response(date: OrderDate) -> MessageResponse {
    MessageResponse::new(format!(":white_check_mark: Order for {date} closed."))
}

/// Answer when no order was ever opened for the date.
#[must_use]
pub fn no_order_for_date_response(date: OrderDate) -> MessageResponse {
    MessageResponse::new(format!(":x: There is no order for {date}."))
}

/// Rejection when the order for the date is closed already.
#[must_use]
pub fn order_already_closed_response(date: OrderDate) -> MessageResponse {
    MessageResponse::new(format!(":x: The order for {date} is closed already."))
}

/// The caller's net balance.
#[must_use]
pub fn balance_response(balance: Money) -> MessageResponse {
    MessageResponse::new(format!("Your balance is: {} PLN.", balance.readable()))
}

/// Confirmation for a recorded payment, with the sender's balance around it.
#[must_use]
pub fn payment_received_response(amount: Money, before: Money, after: Money) -> MessageResponse {
    MessageResponse::new(format!(
        ":white_check_mark: {} PLN received.\nBalance before: {} PLN.\nBalance after: {} PLN.",
        amount.readable(),
        before.readable(),
        after.readable()
    ))
}

/// Echo for a freshly added order item.
#[must_use]
pub fn item_added_response(item: &OrderItem) -> MessageResponse {
    MessageResponse::new(format!(
        ":white_check_mark: Your order item was added: {}.",
        item_line(item)
    ))
}

/// The numbered item listing of the currently open order.
#[must_use]
pub fn show_order_response(order: &Order) -> MessageResponse {
    let lines: Vec<String> = order
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. <@{}>, {}", i + 1, item.author, item_line(item)))
        .collect();
    MessageResponse::new(format!(
        "Items of the current order ({}):\n{}",
        order.date,
        lines.join("\n")
    ))
}

fn item_line(item: &OrderItem) -> String {
    let mut line = format!("{}, {}, {}", item.item_type, item.filling, item.sauce);
    if let Some(drink) = item.drink {
        line.push_str(&format!(", {drink}"));
    }
    line.push_str(&format!(", {}", item.comments));
    line
}

/// Maps a service error to the chat message the user sees. Validation
/// errors keep their specific hint; infrastructure failures are logged and
/// apologized for.
#[must_use]
pub fn error_response(err: &ServiceError) -> MessageResponse {
    match err {
        ServiceError::OrderAlreadyExists { date } => new_order_date_colliding_response(*date),
        ServiceError::OrderNotFound { date } => no_order_for_date_response(*date),
        ServiceError::OrderAlreadyClosed { date } => order_already_closed_response(*date),
        ServiceError::ExactlyOneOrderRequired { open_count: 0 } => no_opened_order_response(),
        ServiceError::ExactlyOneOrderRequired { .. } => more_than_one_order_response(),
        ServiceError::Log(log_err) => {
            tracing::error!(error = %log_err, "command failed on the event log");
            MessageResponse::new("Something went wrong. Please try again later.")
        },
    }
}

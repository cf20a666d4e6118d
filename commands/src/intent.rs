//! Slash-command text parsing.
//!
//! The chat surface delivers the raw text that followed `/burrito`. Parsing
//! never fails: unrecognized text becomes [`CommandIntent::Help`], and the
//! date-taking commands keep their identity even when the date is malformed
//! so the handler can answer with a command-specific hint instead of the
//! generic help message.

use burrito_club_core::types::OrderDate;

/// What the user asked for, decoded from the slash-command text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandIntent {
    /// `help`, or anything that matched nothing else.
    Help,

    /// `order`: present the item buttons for the currently open order.
    ShowButtons,

    /// `open new order <yyyy-mm-dd>`; `None` when the date was missing or
    /// malformed.
    OpenNewOrder {
        /// The parsed date, if the argument was well-formed.
        date: Option<OrderDate>,
    },

    /// `close order <yyyy-mm-dd>`; `None` when the date was missing or
    /// malformed.
    CloseOrder {
        /// The parsed date, if the argument was well-formed.
        date: Option<OrderDate>,
    },

    /// `show order`: list the items of the currently open order.
    ShowOrder,

    /// `get sms <yyyy-mm-dd>`; `None` when the date was missing or
    /// malformed.
    GetSms {
        /// The parsed date, if the argument was well-formed.
        date: Option<OrderDate>,
    },

    /// `balance`: the caller's net balance.
    Balance,
}

/// Parses the text that followed `/burrito`.
#[must_use]
pub fn parse(text: &str) -> CommandIntent {
    let text = text.trim_start();

    match text.trim_end() {
        "order" => return CommandIntent::ShowButtons,
        "show order" => return CommandIntent::ShowOrder,
        "balance" => return CommandIntent::Balance,
        _ => {},
    }

    // Date-taking commands are routed on their prefix alone, so a glued or
    // garbled date ("open new order2019-11-11") still reaches the right
    // handler and gets the date hint rather than the help text.
    if let Some(rest) = text.strip_prefix("open new order") {
        return CommandIntent::OpenNewOrder {
            date: date_argument(rest),
        };
    }
    if let Some(rest) = text.strip_prefix("close order") {
        return CommandIntent::CloseOrder {
            date: date_argument(rest),
        };
    }
    if let Some(rest) = text.strip_prefix("get sms") {
        return CommandIntent::GetSms {
            date: date_argument(rest),
        };
    }

    CommandIntent::Help
}

/// The date must be separated from the command by whitespace and be the only
/// argument; surrounding whitespace is fine.
fn date_argument(rest: &str) -> Option<OrderDate> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let mut tokens = rest.split_whitespace();
    let token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    token.parse().ok()
}

//! # Burrito Club Commands
//!
//! The chat-facing layer of the burrito club ledger: parses the text that
//! follows `/burrito`, routes it (and dialog submissions) to the order
//! service, and renders every outcome as a `{ text }` message.
//!
//! ```no_run
//! use burrito_club_commands::{intent, CommandRouter, Config};
//! use burrito_club_core::environment::{SystemClock, UuidIdGenerator};
//! use burrito_club_core::service::OrderService;
//! use burrito_club_testing::InMemoryEventLog;
//! use burrito_club_core::types::UserId;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let service = OrderService::new(
//!     Arc::new(InMemoryEventLog::new()),
//!     Arc::new(SystemClock),
//!     Arc::new(UuidIdGenerator),
//! );
//! let router = CommandRouter::new(service, Config::default());
//!
//! let caller = UserId::from("U1337");
//! let response = router
//!     .dispatch(&caller, intent::parse("open new order 2019-01-01"))
//!     .await;
//! println!("{}", response.text);
//! # }
//! ```

pub mod config;
pub mod handlers;
pub mod intent;

pub use config::{Config, ConfigError};
pub use handlers::{CommandRouter, MessageResponse, PaymentSubmission};
pub use intent::CommandIntent;

//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! The handlers are organized in a testable way, allowing integration tests
//! to use the same handler tree as production code.

mod callbacks;
mod commands;
mod messages;
mod schema;
mod types;

pub use callbacks::{selected_text, EXPIRED_TEXT};
pub use commands::{start_text, HELP_TEXT, NO_LOGS_TEXT};
pub use messages::NOT_A_LINK_TEXT;
pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};

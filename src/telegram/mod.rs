//! Telegram bot integration and handlers

pub mod auth;
pub mod bot;
pub mod handlers;
pub mod menu;
pub mod session;

// Re-exports for convenience
pub use auth::AllowList;
pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use session::SessionStore;

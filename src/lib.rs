//! tubedrop - Telegram bot that downloads videos through yt-dlp
//!
//! An allow-listed user sends a YouTube link, picks a quality from an inline
//! menu, and gets the file back as an audio or video reply.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, process execution, link classification
//! - `download`: option table, command line, background download task
//! - `telegram`: authorization gate, sessions, menu, handler tree

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{AppError, AppResult, Settings};
pub use download::{DownloadDispatcher, DownloadOption};
pub use telegram::{schema, HandlerDeps};

//! Download dispatch: option table, command line, background task

pub mod command;
pub mod courier;
pub mod dispatcher;
pub mod error;
pub mod option;
pub mod request;

// Re-exports for convenience
pub use courier::Courier;
pub use dispatcher::DownloadDispatcher;
pub use error::DownloadError;
pub use option::{DownloadOption, MediaKind};
pub use request::{DownloadRequest, PendingRequest};

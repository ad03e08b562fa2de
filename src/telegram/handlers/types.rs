//! Handler types and dependencies

use std::path::PathBuf;
use std::sync::Arc;

use crate::download::DownloadDispatcher;
use crate::telegram::auth::AllowList;
use crate::telegram::session::SessionStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub allow_list: AllowList,
    pub sessions: SessionStore,
    pub dispatcher: DownloadDispatcher,
    /// Log file read by /getLogs
    pub log_file: Arc<PathBuf>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(allow_list: AllowList, sessions: SessionStore, dispatcher: DownloadDispatcher, log_file: PathBuf) -> Self {
        Self {
            allow_list,
            sessions,
            dispatcher,
            log_file: Arc::new(log_file),
        }
    }
}

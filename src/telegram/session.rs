//! Pending requests, one per conversation
//!
//! A new link replaces whatever was pending in that chat (last write wins).
//! Selecting an option takes the record out, so it is cleared as soon as the
//! download is handed to the dispatcher.

use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::download::{DownloadOption, DownloadRequest, PendingRequest};

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    pending: Arc<DashMap<ChatId, PendingRequest>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `request` for `chat_id`, returning the one it replaced
    pub fn remember(&self, chat_id: ChatId, request: PendingRequest) -> Option<PendingRequest> {
        self.pending.insert(chat_id, request)
    }

    /// Applies the selection and removes the record
    ///
    /// Returns `None` when nothing is pending for the chat, e.g. after a
    /// restart or a second press on an already used menu.
    pub fn select(&self, chat_id: ChatId, option: DownloadOption) -> Option<DownloadRequest> {
        let (_, mut pending) = self.pending.remove(&chat_id)?;
        pending.select(option);
        pending.into_ready(chat_id)
    }

    pub fn get(&self, chat_id: ChatId) -> Option<PendingRequest> {
        self.pending.get(&chat_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

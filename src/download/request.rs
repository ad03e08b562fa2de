//! Per-conversation request state

use teloxide::types::{ChatId, MessageId, UserId};

use crate::download::option::DownloadOption;

/// A classified link waiting for the user to pick an option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Full text of the message that contained the link
    pub link: String,
    pub user_id: UserId,
    /// Message the link arrived in; every later reply quotes it
    pub message_id: MessageId,
    pub selected_option: Option<DownloadOption>,
}

/// A request with both link and option present, ready to run
///
/// Only [`PendingRequest::into_ready`] builds one, so a download can never
/// start without a selected option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub message_id: MessageId,
    pub link: String,
    pub option: DownloadOption,
}

impl PendingRequest {
    pub fn new(link: impl Into<String>, user_id: UserId, message_id: MessageId) -> Self {
        Self {
            link: link.into(),
            user_id,
            message_id,
            selected_option: None,
        }
    }

    pub fn select(&mut self, option: DownloadOption) {
        self.selected_option = Some(option);
    }

    /// Converts into a runnable request, or `None` while no option is selected
    pub fn into_ready(self, chat_id: ChatId) -> Option<DownloadRequest> {
        let option = self.selected_option?;
        Some(DownloadRequest {
            chat_id,
            user_id: self.user_id,
            message_id: self.message_id,
            link: self.link,
            option,
        })
    }
}

//! Outbound delivery seam
//!
//! The download task only needs to post replies and attachments. Going through
//! this trait instead of `Bot` directly lets tests record what would be sent.

use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ReplyParameters};

use crate::core::error::AppResult;
use crate::download::option::MediaKind;

#[async_trait]
pub trait Courier: Send + Sync {
    /// Sends `text` as a reply to `reply_to`
    async fn send_text(&self, chat_id: ChatId, reply_to: MessageId, text: String) -> AppResult<()>;

    /// Uploads the file at `path` as an audio or video reply to `reply_to`
    async fn send_media(&self, chat_id: ChatId, reply_to: MessageId, kind: MediaKind, path: &Path) -> AppResult<()>;
}

#[async_trait]
impl Courier for Bot {
    async fn send_text(&self, chat_id: ChatId, reply_to: MessageId, text: String) -> AppResult<()> {
        self.send_message(chat_id, text)
            .reply_parameters(ReplyParameters::new(reply_to))
            .await?;
        Ok(())
    }

    async fn send_media(&self, chat_id: ChatId, reply_to: MessageId, kind: MediaKind, path: &Path) -> AppResult<()> {
        let file = InputFile::file(path.to_path_buf());
        match kind {
            MediaKind::Audio => {
                self.send_audio(chat_id, file)
                    .reply_parameters(ReplyParameters::new(reply_to))
                    .await?;
            }
            MediaKind::Video => {
                self.send_video(chat_id, file)
                    .reply_parameters(ReplyParameters::new(reply_to))
                    .supports_streaming(true)
                    .await?;
            }
        }
        Ok(())
    }
}

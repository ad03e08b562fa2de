//! Text messages: link classification and the option menu

use teloxide::prelude::*;
use teloxide::types::{Message, ReplyParameters};

use super::types::{HandlerDeps, HandlerError};
use crate::core::validation::is_video_link;
use crate::download::PendingRequest;
use crate::telegram::auth::authorize;
use crate::telegram::menu::{option_keyboard, PROMPT};

pub const NOT_A_LINK_TEXT: &str = "I'm sorry, but I couldn't find a valid YouTube URL here.";

/// Gate, then either show the menu or explain that no link was found
pub(super) async fn handle_text_message(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if !authorize(bot, msg, &deps.allow_list).await? {
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };

    if is_video_link(text) {
        present_options(bot, msg, text, deps).await
    } else {
        log::info!("No video link in message {} from chat {}", msg.id, msg.chat.id);
        bot.send_message(msg.chat.id, NOT_A_LINK_TEXT)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
        Ok(())
    }
}

async fn present_options(bot: &Bot, msg: &Message, link: &str, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let request = PendingRequest::new(link, user.id, msg.id);
    if deps.sessions.remember(msg.chat.id, request).is_some() {
        log::info!("Replaced pending request in chat {}", msg.chat.id);
    }
    log::info!("Link from {} in chat {}, showing options", user.id, msg.chat.id);

    bot.send_message(msg.chat.id, PROMPT)
        .reply_markup(option_keyboard())
        .await?;
    Ok(())
}

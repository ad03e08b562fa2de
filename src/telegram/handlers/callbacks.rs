//! Option menu presses

use teloxide::prelude::*;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::auth::authorize_callback;
use crate::telegram::menu::parse_callback_data;

pub const EXPIRED_TEXT: &str = "This request has expired. Please send the link again.";

pub fn selected_text(label: &str) -> String {
    format!("Selected option: {}", label)
}

/// Answers the press, marks the menu as used and hands the request to the dispatcher
pub(super) async fn handle_option_callback(bot: &Bot, q: &CallbackQuery, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if !authorize_callback(bot, q, &deps.allow_list).await? {
        return Ok(());
    }
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let selection = match parse_callback_data(data) {
        Ok(selection) => selection,
        Err(e) => {
            log::warn!("Ignoring callback from {}: {}", q.from.id, e);
            return Ok(());
        }
    };

    let chat_id = match q.message.as_ref() {
        Some(message) => {
            let chat_id = message.chat().id;
            // The menu may be too old to edit; the download still goes ahead
            if let Err(e) = bot
                .edit_message_text(chat_id, message.id(), selected_text(&selection.label))
                .await
            {
                log::warn!("Failed to edit option menu in chat {}: {}", chat_id, e);
            }
            chat_id
        }
        None => ChatId::from(q.from.id),
    };

    match deps.sessions.select(chat_id, selection.option) {
        Some(request) => {
            log::info!("Dispatching {} download for chat {}", request.option, chat_id);
            // Detached: the task reports its own outcome in the chat
            drop(deps.dispatcher.dispatch(request));
        }
        None => {
            log::info!("No pending request in chat {} for option {}", chat_id, selection.option);
            bot.send_message(chat_id, EXPIRED_TEXT).await?;
        }
    }
    Ok(())
}

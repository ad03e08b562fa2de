//! Authorization gate
//!
//! Every restricted handler calls [`authorize`] (or [`authorize_callback`])
//! first and returns early when it yields `false`. The denial reply is the
//! only side effect.

use std::collections::HashSet;
use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ReplyParameters, User};

/// Static allow-list of Telegram usernames
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    usernames: Arc<HashSet<String>>,
}

impl AllowList {
    /// Builds the list; a leading `@` on an entry is ignored
    pub fn new<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let usernames = usernames
            .into_iter()
            .map(|name| name.as_ref().trim().trim_start_matches('@').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self {
            usernames: Arc::new(usernames),
        }
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }

    /// Users without a username are never allowed
    pub fn allows(&self, user: Option<&User>) -> bool {
        user.and_then(|u| u.username.as_deref())
            .is_some_and(|name| self.usernames.contains(name))
    }
}

/// Name shown in the denial: the username, or the numeric id when there is none
fn display_name(user: Option<&User>) -> String {
    match user {
        Some(u) => u.username.clone().unwrap_or_else(|| u.id.to_string()),
        None => "unknown".to_string(),
    }
}

pub fn denial_text(user: Option<&User>) -> String {
    format!("User {} is not authorized to use this bot.", display_name(user))
}

/// Checks the sender of `msg`; replies with the denial when not allowed
///
/// # Returns
/// * `Ok(true)` - sender is allow-listed, the caller may proceed
/// * `Ok(false)` - denial sent, the caller must stop
pub async fn authorize(bot: &Bot, msg: &Message, allow_list: &AllowList) -> ResponseResult<bool> {
    let user = msg.from.as_ref();
    if allow_list.allows(user) {
        return Ok(true);
    }

    let text = denial_text(user);
    log::info!("{} (chat {})", text, msg.chat.id);
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(false)
}

/// Same gate for inline keyboard presses
///
/// The query is answered either way so the client stops its spinner.
pub async fn authorize_callback(bot: &Bot, q: &CallbackQuery, allow_list: &AllowList) -> ResponseResult<bool> {
    if allow_list.allows(Some(&q.from)) {
        return Ok(true);
    }

    let text = denial_text(Some(&q.from));
    log::info!("{} (callback from {})", text, q.from.id);
    bot.answer_callback_query(q.id.clone()).await?;
    let chat_id = q
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or_else(|| ChatId::from(q.from.id));
    bot.send_message(chat_id, text).await?;
    Ok(false)
}

//! Command handlers: /start, /help, /getLogs

use indoc::indoc;
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::core::config;
use crate::core::logging::tail_log;
use crate::telegram::auth::authorize;

pub const HELP_TEXT: &str = indoc! {r#"
    To use this bot, just send a link of the YouTube video you would like to download, and it will be sent as a file to you.

    e.g. just send "https://www.youtube.com/watch?v=E3Pv4c4Qz9w" (without quotes) and I will show you the options."#};

pub const NO_LOGS_TEXT: &str = "No log entries yet.";

/// Telegram's message length limit
const MAX_MESSAGE_CHARS: usize = 4096;

pub fn start_text(first_name: &str) -> String {
    format!("Hi {}. Type /help for more information about this bot.", first_name)
}

/// Greets anyone; not behind the gate
pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    let first_name = msg.from.as_ref().map(|u| u.first_name.as_str()).unwrap_or("there");
    bot.send_message(msg.chat.id, start_text(first_name)).await?;
    Ok(())
}

pub(super) async fn handle_help_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if !authorize(bot, msg, &deps.allow_list).await? {
        return Ok(());
    }
    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}

/// Replies with the tail of the log file
pub(super) async fn handle_get_logs_command(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    if !authorize(bot, msg, &deps.allow_list).await? {
        return Ok(());
    }

    let lines = tail_log(&deps.log_file, config::logging::TAIL_LINES).await?;
    let text = render_log_tail(&lines);
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Joins log lines, dropping the oldest ones until the text fits one message
fn render_log_tail(lines: &[String]) -> String {
    let mut start = 0;
    loop {
        let text = lines[start..].join("\n");
        if text.trim().is_empty() {
            return NO_LOGS_TEXT.to_string();
        }
        if text.chars().count() <= MAX_MESSAGE_CHARS || start + 1 >= lines.len() {
            return text.chars().take(MAX_MESSAGE_CHARS).collect();
        }
        start += 1;
    }
}

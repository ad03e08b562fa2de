//! Integration tests for Telegram handlers using teloxide_tests
//!
//! These tests run the production handler tree against a mocked Bot API.
//! Run with: cargo test --test handlers_test

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serial_test::serial;
use tempfile::TempDir;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide_tests::{MockBot, MockCallbackQuery, MockMessageText, MockUser};

use tubedrop::core::config::DownloadConfig;
use tubedrop::core::AppResult;
use tubedrop::download::dispatcher::WORKING_TEXT;
use tubedrop::download::{Courier, DownloadDispatcher, DownloadOption, MediaKind, PendingRequest};
use tubedrop::telegram::handlers::{
    selected_text, start_text, EXPIRED_TEXT, HELP_TEXT, NOT_A_LINK_TEXT, NO_LOGS_TEXT,
};
use tubedrop::telegram::menu::{callback_data, PROMPT};
use tubedrop::telegram::{schema, AllowList, HandlerDeps, SessionStore};

/// Courier for handler tests; downloads are never expected to reach it
struct NullCourier;

#[async_trait]
impl Courier for NullCourier {
    async fn send_text(&self, _chat_id: ChatId, _reply_to: MessageId, _text: String) -> AppResult<()> {
        Ok(())
    }

    async fn send_media(&self, _chat_id: ChatId, _reply_to: MessageId, _kind: MediaKind, _path: &Path) -> AppResult<()> {
        Ok(())
    }
}

/// Courier that keeps every text reply the download task sends
#[derive(Default)]
struct RecordingCourier {
    texts: Mutex<Vec<(ChatId, MessageId, String)>>,
}

impl RecordingCourier {
    fn texts(&self) -> Vec<(ChatId, MessageId, String)> {
        self.texts.lock().unwrap().clone()
    }

    /// Waits until the background task has sent `count` replies
    async fn wait_for(&self, count: usize) -> Vec<(ChatId, MessageId, String)> {
        for _ in 0..250 {
            let texts = self.texts();
            if texts.len() >= count {
                return texts;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("expected {} replies, got {:?}", count, self.texts());
    }
}

#[async_trait]
impl Courier for RecordingCourier {
    async fn send_text(&self, chat_id: ChatId, reply_to: MessageId, text: String) -> AppResult<()> {
        self.texts.lock().unwrap().push((chat_id, reply_to, text));
        Ok(())
    }

    async fn send_media(&self, _chat_id: ChatId, _reply_to: MessageId, _kind: MediaKind, _path: &Path) -> AppResult<()> {
        Ok(())
    }
}

/// Username teloxide_tests puts on every mocked update
fn mock_username() -> String {
    MockUser::new().build().username.expect("mock user has a username")
}

fn create_test_deps(allowed: &[String], log_file: PathBuf) -> HandlerDeps {
    deps_with_courier(allowed, log_file, PathBuf::from("/nonexistent/yt-dlp"), Arc::new(NullCourier))
}

fn deps_with_courier(allowed: &[String], log_file: PathBuf, ytdlp_path: PathBuf, courier: Arc<dyn Courier>) -> HandlerDeps {
    let config = DownloadConfig {
        ytdlp_path,
        download_dir: std::env::temp_dir(),
        send_timeout: Duration::from_secs(1),
    };
    HandlerDeps::new(
        AllowList::new(allowed),
        SessionStore::new(),
        DownloadDispatcher::new(config, courier),
        log_file,
    )
}

/// Chat the handler resolves for the default mocked callback query
fn mock_callback_chat() -> ChatId {
    let query = MockCallbackQuery::new().build();
    query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or_else(|| ChatId::from(query.from.id))
}

fn allowed_deps() -> HandlerDeps {
    create_test_deps(&[mock_username()], PathBuf::from("/nonexistent/tubedrop.log"))
}

fn denied_deps() -> HandlerDeps {
    create_test_deps(&["someone_else".to_string()], PathBuf::from("/nonexistent/tubedrop.log"))
}

fn denial() -> String {
    format!("User {} is not authorized to use this bot.", mock_username())
}

#[tokio::test]
#[serial]
async fn test_start_greets_everyone() {
    let message = MockMessageText::new().text("/start");
    let mut bot = MockBot::new(message, schema(denied_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages.len(), 1);
    let first_name = MockUser::new().build().first_name;
    assert_eq!(responses.sent_messages[0].text(), Some(start_text(&first_name).as_str()));
}

#[tokio::test]
#[serial]
async fn test_help_for_authorized_user() {
    let message = MockMessageText::new().text("/help");
    let mut bot = MockBot::new(message, schema(allowed_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages.len(), 1);
    assert_eq!(responses.sent_messages[0].text(), Some(HELP_TEXT));
}

#[tokio::test]
#[serial]
async fn test_help_denied_for_unknown_user() {
    let message = MockMessageText::new().text("/help");
    let mut bot = MockBot::new(message, schema(denied_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages.len(), 1);
    assert_eq!(responses.sent_messages[0].text(), Some(denial().as_str()));
}

#[tokio::test]
#[serial]
async fn test_link_from_unknown_user_is_denied_without_session() {
    let deps = denied_deps();
    let sessions = deps.sessions.clone();
    let message = MockMessageText::new().text("https://www.youtube.com/watch?v=E3Pv4c4Qz9w");
    let mut bot = MockBot::new(message, schema(deps));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages.len(), 1);
    assert_eq!(responses.sent_messages[0].text(), Some(denial().as_str()));
    assert!(sessions.is_empty());
}

#[tokio::test]
#[serial]
async fn test_text_without_link_is_rejected() {
    let deps = allowed_deps();
    let sessions = deps.sessions.clone();
    let message = MockMessageText::new().text("hello there");
    let mut bot = MockBot::new(message, schema(deps));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages.len(), 1);
    assert_eq!(responses.sent_messages[0].text(), Some(NOT_A_LINK_TEXT));
    assert!(sessions.is_empty());
}

#[tokio::test]
#[serial]
async fn test_playlist_link_is_rejected() {
    let message = MockMessageText::new().text("https://www.youtube.com/playlist?list=PL590L5WQmH8fJ54F369BLDSqIwcs-TCfs");
    let mut bot = MockBot::new(message, schema(allowed_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages[0].text(), Some(NOT_A_LINK_TEXT));
}

#[tokio::test]
#[serial]
async fn test_channel_and_search_pages_are_rejected() {
    for text in [
        "https://www.youtube.com/channel/UCuAXFkgsw1L7xaCfnd5JJOw",
        "https://www.youtube.com/results?search_query=cats",
    ] {
        let deps = allowed_deps();
        let sessions = deps.sessions.clone();
        let mut bot = MockBot::new(MockMessageText::new().text(text), schema(deps));

        bot.dispatch().await;

        let responses = bot.get_responses();
        assert_eq!(responses.sent_messages[0].text(), Some(NOT_A_LINK_TEXT), "text {}", text);
        assert!(sessions.is_empty());
    }
}

#[tokio::test]
#[serial]
async fn test_link_shows_option_menu_and_remembers_request() {
    let deps = allowed_deps();
    let sessions = deps.sessions.clone();
    let link = "check this https://youtu.be/E3Pv4c4Qz9w";
    let message = MockMessageText::new().text(link);
    let mut bot = MockBot::new(message, schema(deps));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages.len(), 1);
    let prompt = &responses.sent_messages[0];
    assert_eq!(prompt.text(), Some(PROMPT));

    match prompt.reply_markup() {
        Some(markup) => assert_eq!(markup.inline_keyboard.len(), 7),
        None => panic!("option menu should carry an inline keyboard"),
    }

    assert_eq!(sessions.len(), 1);
    let pending = sessions.get(prompt.chat.id).expect("request stored for the chat");
    assert_eq!(pending.link, link);
    assert!(pending.selected_option.is_none());
}

#[tokio::test]
#[serial]
async fn test_get_logs_without_log_file() {
    let message = MockMessageText::new().text("/getLogs");
    let mut bot = MockBot::new(message, schema(allowed_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages.len(), 1);
    assert_eq!(responses.sent_messages[0].text(), Some(NO_LOGS_TEXT));
}

#[tokio::test]
#[serial]
async fn test_get_logs_returns_tail() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("tubedrop.log");
    let lines: Vec<String> = (1..=15).map(|i| format!("line {}", i)).collect();
    std::fs::write(&log_file, lines.join("\n")).unwrap();

    let message = MockMessageText::new().text("/getLogs");
    let mut bot = MockBot::new(message, schema(create_test_deps(&[mock_username()], log_file)));

    bot.dispatch().await;

    let responses = bot.get_responses();
    let text = responses.sent_messages[0].text().unwrap();
    assert!(text.starts_with("line 6\n"));
    assert!(text.ends_with("line 15"));
}

#[tokio::test]
#[serial]
async fn test_get_logs_denied_for_unknown_user() {
    let message = MockMessageText::new().text("/getLogs");
    let mut bot = MockBot::new(message, schema(denied_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert_eq!(responses.sent_messages[0].text(), Some(denial().as_str()));
}

#[tokio::test]
#[serial]
async fn test_callback_from_unknown_user_is_denied() {
    let callback = MockCallbackQuery::new().data("720 | Up to 720p 📺");
    let mut bot = MockBot::new(callback, schema(denied_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert!(
        !responses.answered_callback_queries.is_empty(),
        "Should answer callback query"
    );
    assert_eq!(responses.sent_messages.len(), 1);
    assert_eq!(responses.sent_messages[0].text(), Some(denial().as_str()));
    assert!(responses.edited_messages_text.is_empty());
}

#[tokio::test]
#[serial]
async fn test_callback_without_pending_request_expires() {
    let callback = MockCallbackQuery::new().data("720 | Up to 720p 📺");
    let mut bot = MockBot::new(callback, schema(allowed_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert!(!responses.answered_callback_queries.is_empty());
    let last = responses.sent_messages.last().expect("expiry notice");
    assert_eq!(last.text(), Some(EXPIRED_TEXT));
}

#[tokio::test]
#[serial]
async fn test_callback_with_unknown_option_is_ignored() {
    let callback = MockCallbackQuery::new().data("4k | Up to 4K");
    let mut bot = MockBot::new(callback, schema(allowed_deps()));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert!(!responses.answered_callback_queries.is_empty());
    assert!(responses.sent_messages.is_empty());
    assert!(responses.edited_messages_text.is_empty());
}

#[cfg(unix)]
#[tokio::test]
#[serial]
async fn test_selection_edits_menu_and_dispatches_latest_request() {
    use std::os::unix::fs::PermissionsExt;

    // Stand-in for yt-dlp: fails and echoes the link it was given
    let tools = TempDir::new().unwrap();
    let ytdlp = tools.path().join("fake-yt-dlp");
    std::fs::write(&ytdlp, "#!/bin/sh\necho \"$1\" >&2\nexit 3\n").unwrap();
    std::fs::set_permissions(&ytdlp, std::fs::Permissions::from_mode(0o755)).unwrap();

    let courier = Arc::new(RecordingCourier::default());
    let deps = deps_with_courier(
        &[mock_username()],
        PathBuf::from("/nonexistent/tubedrop.log"),
        ytdlp,
        courier.clone(),
    );
    let sessions = deps.sessions.clone();

    // Two links in a row: the later one wins
    let chat_id = mock_callback_chat();
    sessions.remember(
        chat_id,
        PendingRequest::new("https://youtu.be/aaaaaaaaaaa", UserId(1), MessageId(10)),
    );
    sessions.remember(
        chat_id,
        PendingRequest::new("https://youtu.be/E3Pv4c4Qz9w", UserId(1), MessageId(11)),
    );

    let label = DownloadOption::P720.label();
    let callback = MockCallbackQuery::new().data(&callback_data(DownloadOption::P720));
    let mut bot = MockBot::new(callback, schema(deps));

    bot.dispatch().await;

    let responses = bot.get_responses();
    assert!(!responses.answered_callback_queries.is_empty());
    assert_eq!(
        responses.edited_messages_text[0].message.text(),
        Some(selected_text(label).as_str())
    );
    assert!(!responses
        .sent_messages
        .iter()
        .any(|m| m.text() == Some(EXPIRED_TEXT)));
    assert!(sessions.is_empty());

    let texts = courier.wait_for(2).await;
    assert_eq!(texts[0], (chat_id, MessageId(11), WORKING_TEXT.to_string()));
    assert_eq!(texts[1].1, MessageId(11));
    assert_eq!(texts[1].2, "process exited with code 3 ```https://youtu.be/E3Pv4c4Qz9w```");
}

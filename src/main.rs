use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use teloxide::update_listeners::Polling;

use tubedrop::cli::{Cli, Commands};
use tubedrop::core::config::DEFAULT_SETTINGS_PATH;
use tubedrop::core::logging::log_downloader_check;
use tubedrop::core::{init_logger, AppResult, Settings};
use tubedrop::download::{Courier, DownloadDispatcher, DownloadOption, DownloadRequest, MediaKind};
use tubedrop::telegram::{create_bot, schema, setup_bot_commands, AllowList, HandlerDeps, SessionStore};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (settings, logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Log panics from handler tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::Run { config }) => run_bot(&config).await,
        Some(Commands::CheckConfig { config }) => run_check_config(&config).await,
        Some(Commands::Download { url, option, config }) => run_cli_download(&config, url, &option).await,
        Some(Commands::Options) => {
            print_options();
            Ok(())
        }
        None => run_bot(Path::new(DEFAULT_SETTINGS_PATH)).await,
    }
}

/// Loads settings and starts the logger
///
/// Settings come first because they name the log file; a settings error is
/// returned before any log output exists and is printed by `anyhow`.
fn bootstrap(config_path: &Path) -> Result<Settings> {
    let settings = Settings::load(config_path)?;
    init_logger(&settings.log_file)?;
    Ok(settings)
}

/// Runs the bot with long polling until Ctrl+C
async fn run_bot(config_path: &Path) -> Result<()> {
    let settings = bootstrap(config_path)?;

    log::info!("Starting tubedrop with settings from {}", config_path.display());
    settings.log_summary();
    log_downloader_check(&settings.ytdlp_path).await;

    let bot = create_bot(&settings)?;

    // A failure here only affects the command list shown by Telegram clients
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let allow_list = AllowList::new(&settings.authorized_users);
    if allow_list.is_empty() {
        log::warn!("AUTHORIZED_USERS is empty: every restricted action will be denied");
    } else {
        log::info!("Authorized users: {}", allow_list.len());
    }

    let dispatcher = DownloadDispatcher::new(settings.download_config(), Arc::new(bot.clone()));
    let deps = HandlerDeps::new(
        allow_list,
        SessionStore::new(),
        dispatcher,
        settings.log_file.clone(),
    );

    log::info!("Bot is polling for updates");

    // Create polling listener that drops pending updates on start
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Prints the resolved settings and the downloader version
async fn run_check_config(config_path: &Path) -> Result<()> {
    let settings = bootstrap(config_path)?;

    println!("Settings loaded from {}", config_path.display());
    println!("  Authorized users: {}", settings.authorized_users.join(", "));
    println!("  yt-dlp path:      {}", settings.ytdlp_path.display());
    println!("  Download dir:     {}", settings.download_dir.display());
    println!("  Log file:         {}", settings.log_file.display());
    println!("  Send timeout:     {}s", settings.send_timeout_secs);
    if let Some(ref url) = settings.bot_api_url {
        println!("  Bot API URL:      {}", url);
    }

    log_downloader_check(&settings.ytdlp_path).await;
    Ok(())
}

/// Runs one download through the same task the bot uses, printing to stdout
async fn run_cli_download(config_path: &Path, url: String, option_key: &str) -> Result<()> {
    let settings = bootstrap(config_path)?;
    let option = DownloadOption::from_str(option_key).map_err(|_| {
        anyhow::anyhow!(
            "Unknown option {:?}. Use one of: {}",
            option_key,
            DownloadOption::all().map(DownloadOption::key).collect::<Vec<_>>().join(", ")
        )
    })?;

    println!("URL:    {}", url);
    println!("Option: {}", option.label());

    let dispatcher = DownloadDispatcher::new(settings.download_config(), Arc::new(ConsoleCourier));
    let request = DownloadRequest {
        chat_id: ChatId(0),
        user_id: UserId(0),
        message_id: MessageId(0),
        link: url,
        option,
    };
    dispatcher.run(request).await;
    Ok(())
}

fn print_options() {
    for option in DownloadOption::all() {
        println!("{:<6} {}", option.key(), option.label());
        println!("       {}", option.ytdlp_args());
    }
}

/// Stands in for the bot when a download is run from the command line
struct ConsoleCourier;

#[async_trait]
impl Courier for ConsoleCourier {
    async fn send_text(&self, _chat_id: ChatId, _reply_to: MessageId, text: String) -> AppResult<()> {
        println!("{}", text);
        Ok(())
    }

    async fn send_media(&self, _chat_id: ChatId, _reply_to: MessageId, kind: MediaKind, path: &Path) -> AppResult<()> {
        let kind = match kind {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        };
        println!("{}: {}", kind, path.display());
        Ok(())
    }
}

//! Startup configuration
//!
//! Settings are read once at startup from a flat JSON file (`settings.json`
//! by default) and layered with `TUBEDROP_`-prefixed environment variables,
//! so `TUBEDROP_TOKEN=... tubedrop run` overrides the file. There is no reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Json};
use figment::Figment;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::core::error::{AppError, AppResult};

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TUBEDROP_";

/// Log file configuration
pub mod logging {
    /// Log file used when `LOG_FILE` is not set
    pub const DEFAULT_LOG_FILE: &str = "tubedrop.log";

    /// Number of lines returned by /getLogs
    pub const TAIL_LINES: usize = 10;
}

/// Download configuration
pub mod download {
    use super::Duration;

    /// Limit on the whole upload of the finished file, not a per-read socket
    /// timeout: a file that takes longer to upload is reported as failed.
    /// Raise `SEND_TIMEOUT_SECS` for large videos or slow links (in seconds).
    pub const SEND_TIMEOUT_SECS: u64 = 15;

    /// Timeout for `yt-dlp --version` probes (in seconds)
    pub const VERSION_PROBE_TIMEOUT_SECS: u64 = 10;

    /// Version probe timeout duration
    pub fn version_probe_timeout() -> Duration {
        Duration::from_secs(VERSION_PROBE_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds)
    /// Long enough for video uploads; the per-file send timeout is enforced separately.
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from(logging::DEFAULT_LOG_FILE)
}

fn default_send_timeout_secs() -> u64 {
    download::SEND_TIMEOUT_SECS
}

/// Values read from the settings file
///
/// Key names match the file format (`TOKEN`, `AUTHORIZED_USERS`, ...).
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Bot API token
    #[serde(rename = "TOKEN")]
    pub token: SecretString,

    /// Telegram usernames allowed to use the bot, as written in the file
    /// (`AllowList` trims them and drops a leading `@`)
    #[serde(rename = "AUTHORIZED_USERS")]
    pub authorized_users: Vec<String>,

    /// Path to the yt-dlp executable
    #[serde(rename = "YTDLP_PATH")]
    pub ytdlp_path: PathBuf,

    /// Directory finished files are written to
    #[serde(rename = "DOWNLOAD_DIR")]
    pub download_dir: PathBuf,

    #[serde(rename = "LOG_FILE", default = "default_log_file")]
    pub log_file: PathBuf,

    #[serde(rename = "SEND_TIMEOUT_SECS", default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// Custom Bot API server (e.g. a local telegram-bot-api instance)
    #[serde(rename = "BOT_API_URL", default)]
    pub bot_api_url: Option<String>,
}

/// The part of the settings the download task needs
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub ytdlp_path: PathBuf,
    pub download_dir: PathBuf,
    pub send_timeout: Duration,
}

impl Settings {
    /// Loads settings from `path`, then applies environment overrides
    ///
    /// A missing file is not an error by itself: every required key may come
    /// from the environment. A required key missing from both is.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            log::warn!(
                "Settings file {} not found, relying on {}* environment variables",
                path.display(),
                ENV_PREFIX
            );
        }

        let figment = Figment::new()
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX).lowercase(false));

        Self::from_figment(figment)
    }

    /// Extracts and validates settings from an already assembled figment
    pub fn from_figment(figment: Figment) -> AppResult<Self> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from a JSON document, without environment overrides
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        Self::from_figment(Figment::from(Json::string(json)))
    }

    fn validate(&self) -> AppResult<()> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(AppError::Config("TOKEN is empty".to_string()));
        }
        if self.ytdlp_path.as_os_str().is_empty() {
            return Err(AppError::Config("YTDLP_PATH is empty".to_string()));
        }
        if self.download_dir.as_os_str().is_empty() {
            return Err(AppError::Config("DOWNLOAD_DIR is empty".to_string()));
        }
        Ok(())
    }

    pub fn download_config(&self) -> DownloadConfig {
        DownloadConfig {
            ytdlp_path: self.ytdlp_path.clone(),
            download_dir: self.download_dir.clone(),
            send_timeout: Duration::from_secs(self.send_timeout_secs),
        }
    }

    /// Logs the resolved settings without the token
    pub fn log_summary(&self) {
        log::info!("yt-dlp path: {}", self.ytdlp_path.display());
        log::info!("Download dir: {}", self.download_dir.display());
        log::info!("Log file: {}", self.log_file.display());
        log::info!("Send timeout: {}s", self.send_timeout_secs);
        if let Some(ref url) = self.bot_api_url {
            log::info!("Bot API URL: {}", url);
        }
    }
}

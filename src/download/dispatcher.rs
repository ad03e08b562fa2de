//! Background download task
//!
//! Each selected option becomes one `tokio::spawn`ed task. There is no queue and
//! no concurrency limit. A task runs yt-dlp once and sends back either the
//! file or a failure reply. Nothing is retried and nothing escapes the task:
//! every error ends as a chat message.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::core::config::DownloadConfig;
use crate::core::process::{self, ShellOutput};
use crate::download::command::build_command_line;
use crate::download::courier::Courier;
use crate::download::error::DownloadError;
use crate::download::request::DownloadRequest;

pub const WORKING_TEXT: &str = "Working on it...";
pub const COMPLETED_TEXT: &str = "Download completed. Sending the file to you...";

#[derive(Clone)]
pub struct DownloadDispatcher {
    config: Arc<DownloadConfig>,
    courier: Arc<dyn Courier>,
}

impl DownloadDispatcher {
    pub fn new(config: DownloadConfig, courier: Arc<dyn Courier>) -> Self {
        Self {
            config: Arc::new(config),
            courier,
        }
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Schedules the download and returns immediately
    ///
    /// The handle is only useful to tests; the bot drops it.
    pub fn dispatch(&self, request: DownloadRequest) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.run(request).await })
    }

    /// Runs one download to completion, reporting the outcome in the chat
    pub async fn run(&self, request: DownloadRequest) {
        log::info!(
            "Download started: chat={} user={} option={} link={:?}",
            request.chat_id,
            request.user_id,
            request.option,
            request.link
        );
        self.reply(&request, WORKING_TEXT.to_string()).await;

        match self.download_and_send(&request).await {
            Ok(path) => log::info!("Sent {} to chat {}", path.display(), request.chat_id),
            Err(e) => {
                log::warn!("Download failed for chat {}: {}", request.chat_id, e);
                self.reply(&request, e.user_message()).await;
            }
        }
    }

    async fn download_and_send(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
        let output = self.execute(request).await?;
        self.reply(request, COMPLETED_TEXT.to_string()).await;

        let path = self.output_path(&output)?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(DownloadError::FileNotFound(path.display().to_string()));
        }

        let send = self
            .courier
            .send_media(request.chat_id, request.message_id, request.option.media_kind(), &path);
        // Caps the whole upload, not each socket read; see SEND_TIMEOUT_SECS
        match tokio::time::timeout(self.config.send_timeout, send).await {
            Ok(Ok(())) => Ok(path),
            Ok(Err(e)) => Err(DownloadError::SendFailed(e.to_string())),
            Err(_) => Err(DownloadError::SendTimeout(self.config.send_timeout.as_secs())),
        }
    }

    /// Runs yt-dlp; only a zero exit status counts as success
    async fn execute(&self, request: &DownloadRequest) -> Result<ShellOutput, DownloadError> {
        let command_line = build_command_line(
            &self.config.ytdlp_path,
            &request.link,
            request.option,
            &self.config.download_dir,
        );
        log::info!("Running: {}", command_line);

        let output = process::run_shell(&command_line, &self.config.download_dir)
            .await
            .map_err(|e| DownloadError::Spawn(e.to_string()))?;

        log::info!("yt-dlp finished for chat {} with code {:?}", request.chat_id, output.code);
        if output.success() {
            Ok(output)
        } else {
            Err(DownloadError::ToolFailed {
                code: output.code,
                output: output.combined(),
            })
        }
    }

    /// Path printed by `--exec echo`, resolved against the download dir
    fn output_path(&self, output: &ShellOutput) -> Result<PathBuf, DownloadError> {
        let line = output.last_stdout_line().ok_or(DownloadError::MissingOutputPath)?;
        let path = Path::new(line);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.config.download_dir.join(path))
        }
    }

    async fn reply(&self, request: &DownloadRequest, text: String) {
        if let Err(e) = self.courier.send_text(request.chat_id, request.message_id, text).await {
            log::error!("Failed to send reply to chat {}: {}", request.chat_id, e);
        }
    }
}

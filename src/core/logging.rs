//! Logging initialization and log retrieval
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Downloader availability check at startup
//! - Reading the tail of the log file for /getLogs

use std::path::Path;

use anyhow::Result;
use simplelog::*;

use crate::core::config;
use crate::core::error::AppResult;
use crate::core::process;

/// Initialize logger for both console and file output
///
/// The log file is opened in append mode so restarts keep history for /getLogs.
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to open the log file or a logger is already set
pub fn init_logger(log_file_path: &Path) -> Result<()> {
    let log_file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the downloader version at startup
///
/// A missing or broken binary is only a warning here: every download would
/// fail and report the shell's exit code to the user anyway.
pub async fn log_downloader_check(ytdlp_path: &Path) {
    match process::tool_version(ytdlp_path, config::download::version_probe_timeout()).await {
        Ok(version) => log::info!("✅ yt-dlp {} at {}", version, ytdlp_path.display()),
        Err(e) => {
            log::warn!("⚠️  yt-dlp at {} is not usable: {}", ytdlp_path.display(), e);
            log::warn!("   Downloads will fail until YTDLP_PATH points to a working binary");
        }
    }
}

/// Returns the last `n` non-empty lines of the log file
///
/// A missing file yields an empty list.
pub async fn tail_log(path: &Path, n: usize) -> AppResult<Vec<String>> {
    let content = match fs_err::tokio::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let lines: Vec<&str> = content.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].iter().map(|line| line.to_string()).collect())
}

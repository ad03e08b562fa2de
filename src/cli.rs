use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::DEFAULT_SETTINGS_PATH;

#[derive(Parser)]
#[command(name = "tubedrop")]
#[command(author, version, about = "Telegram bot that downloads videos for allow-listed users via yt-dlp", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot with long polling
    Run {
        /// Path to the settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
        config: PathBuf,
    },

    /// Load the settings file, print a summary and check the downloader
    CheckConfig {
        /// Path to the settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
        config: PathBuf,
    },

    /// Run one download locally, without Telegram, and print the file path
    Download {
        /// Video URL
        url: String,

        /// Option key: audio, 360, 480, 720, 1080, 1440 or max
        #[arg(short, long, default_value = "max")]
        option: String,

        /// Path to the settings file
        #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
        config: PathBuf,
    },

    /// List the download options and their yt-dlp arguments
    Options,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

use thiserror::Error;

/// Maximum characters of tool output quoted back into the chat
///
/// Telegram rejects messages over 4096 characters; the rest of the reply
/// needs some headroom.
pub const MAX_OUTPUT_CHARS: usize = 3500;

/// Failure of one background download
///
/// Every variant ends the request. `user_message()` is what the requester sees.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// yt-dlp ran and exited non-zero (or was killed)
    #[error("yt-dlp exited with code {code:?}")]
    ToolFailed { code: Option<i32>, output: String },

    /// The shell could not be started
    #[error("failed to start yt-dlp: {0}")]
    Spawn(String),

    /// Exit status 0 but nothing on stdout to read a path from
    #[error("yt-dlp did not report an output file")]
    MissingOutputPath,

    /// Exit status 0 but the reported file is not there
    #[error("output file {0} not found")]
    FileNotFound(String),

    /// The Bot API rejected the upload
    #[error("failed to send the file: {0}")]
    SendFailed(String),

    /// The upload did not finish within the send timeout
    #[error("sending the file timed out after {0}s")]
    SendTimeout(u64),
}

impl DownloadError {
    /// Chat reply for this failure
    pub fn user_message(&self) -> String {
        match self {
            DownloadError::ToolFailed { code, output } => {
                let code = code.map(|c| c.to_string()).unwrap_or_else(|| "unknown (killed)".to_string());
                format!(
                    "process exited with code {} ```{}```",
                    code,
                    tail_chars(output, MAX_OUTPUT_CHARS)
                )
            }
            other => format!("Download failed: {}", other),
        }
    }
}

/// Last `max` characters of `s`, on a char boundary
fn tail_chars(s: &str, max: usize) -> &str {
    let count = s.chars().count();
    if count <= max {
        return s;
    }
    match s.char_indices().nth(count - max) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

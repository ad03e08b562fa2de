//! The fixed set of quality/format choices offered for every link

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Format selection shared by every video option: prefer mp4+m4a, fall back to anything
const VIDEO_FORMAT: &str = "-f 'bv*[ext=mp4]+ba[ext=m4a]/b[ext=mp4] / bv*+ba/b'";

/// Format selection for the audio option: mp3 when offered, best audio otherwise
const AUDIO_FORMAT: &str = "-f 'ba*[ext=mp3] / ba' -S 'ext'";

/// One menu entry. The serialized form (`"audio"`, `"360"`, ..., `"max"`) is the
/// option key carried in callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, AsRefStr, IntoStaticStr)]
pub enum DownloadOption {
    #[strum(serialize = "audio")]
    Audio,
    #[strum(serialize = "360")]
    P360,
    #[strum(serialize = "480")]
    P480,
    #[strum(serialize = "720")]
    P720,
    #[strum(serialize = "1080")]
    P1080,
    #[strum(serialize = "1440")]
    P1440,
    #[strum(serialize = "max")]
    Max,
}

/// How the finished file is sent back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl DownloadOption {
    /// All options in menu order
    pub fn all() -> impl Iterator<Item = DownloadOption> {
        DownloadOption::iter()
    }

    /// Canonical option key
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Button label
    pub fn label(self) -> &'static str {
        match self {
            DownloadOption::Audio => "Audio only 🎵",
            DownloadOption::P360 => "Up to 360p 📺",
            DownloadOption::P480 => "Up to 480p 📺",
            DownloadOption::P720 => "Up to 720p 📺",
            DownloadOption::P1080 => "Up to 1080p 📺",
            DownloadOption::P1440 => "Up to 1440p 📺",
            DownloadOption::Max => "Maximum resolution available 📺",
        }
    }

    /// Resolution ceiling, `None` for audio and max
    pub fn max_height(self) -> Option<u32> {
        match self {
            DownloadOption::P360 => Some(360),
            DownloadOption::P480 => Some(480),
            DownloadOption::P720 => Some(720),
            DownloadOption::P1080 => Some(1080),
            DownloadOption::P1440 => Some(1440),
            DownloadOption::Audio | DownloadOption::Max => None,
        }
    }

    /// yt-dlp argument fragment, already quoted for `sh`
    pub fn ytdlp_args(self) -> String {
        if self == DownloadOption::Audio {
            return AUDIO_FORMAT.to_string();
        }
        // Video: capped options sort by resolution, `max` takes the best format
        match self.max_height() {
            Some(height) => format!("{} -S 'res:{}'", VIDEO_FORMAT, height),
            None => VIDEO_FORMAT.to_string(),
        }
    }

    pub fn media_kind(self) -> MediaKind {
        match self {
            DownloadOption::Audio => MediaKind::Audio,
            _ => MediaKind::Video,
        }
    }
}

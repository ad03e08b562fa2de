//! Video link classification
//!
//! A message is a download request when it contains something shaped like a
//! YouTube video link. Nothing is extracted: the whole message text is passed
//! to yt-dlp (shell-escaped), so the classifier only answers yes or no.

use lazy_regex::{lazy_regex, Lazy, Regex};

/// Recognized link shapes:
/// - optional `http://` / `https://`
/// - optional `www.` or `m.`
/// - `youtu.be/<id>`, or `youtube.com/` followed by `watch?v=`, `shorts/`,
///   `live/` or `embed/` and the id
///
/// Other `youtube.com` pages (channels, search, feeds) never match.
///
/// The leading group keeps `notyoutube.com/...` from matching mid-word.
/// Group 1 is the id-like segment, checked against [`PLAYLIST_PREFIX`].
pub static VIDEO_LINK: Lazy<Regex> = lazy_regex!(
    r"(?:^|[^A-Za-z0-9.\-])(?:https?://)?(?:www\.|m\.)?(?:youtu\.be/|youtube\.com/(?:watch\?v=|shorts/|live/|embed/))([A-Za-z0-9_\-]{4,15})"
);

/// Path segment that marks a playlist rather than a single video
const PLAYLIST_PREFIX: &str = "playlist";

/// Returns true if `text` contains a single-video YouTube link
///
/// # Examples
/// ```
/// use tubedrop::core::validation::is_video_link;
///
/// assert!(is_video_link("https://www.youtube.com/watch?v=E3Pv4c4Qz9w"));
/// assert!(is_video_link("youtu.be/E3Pv4c4Qz9w"));
/// assert!(!is_video_link("https://www.youtube.com/playlist?list=PL123"));
/// assert!(!is_video_link("hello there"));
/// ```
pub fn is_video_link(text: &str) -> bool {
    VIDEO_LINK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .any(|id| !id.as_str().starts_with(PLAYLIST_PREFIX))
}

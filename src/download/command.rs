//! yt-dlp command line construction

use std::borrow::Cow;
use std::path::Path;

use shell_escape::unix::escape;

use crate::download::option::DownloadOption;

/// Output file naming template, relative to the `-P` directory
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(resolution)s.%(ext)s";

/// Builds the single `sh -c` command line for one download
///
/// The link is user input and is always shell-escaped; so are the tool path
/// and the output directory. `--exec echo` makes yt-dlp print the final file
/// path as the last stdout line once post-processing is done.
pub fn build_command_line(ytdlp_path: &Path, link: &str, option: DownloadOption, download_dir: &Path) -> String {
    format!(
        "{tool} {link} -o '{template}' {args} -P {dir} --restrict-filenames --exec echo",
        tool = escape(ytdlp_path.to_string_lossy()),
        link = escape(Cow::Borrowed(link)),
        template = OUTPUT_TEMPLATE,
        args = option.ytdlp_args(),
        dir = escape(download_dir.to_string_lossy()),
    )
}

//! Media extraction backends.
//!
//! - [`YtDlpExtractor`] - Runs the `yt-dlp` command-line tool

mod yt_dlp;

pub use yt_dlp::YtDlpExtractor;

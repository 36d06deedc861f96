//! Video URL classification.

use std::sync::LazyLock;

use regex::Regex;

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/|v/|live/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .unwrap()
});

static VIMEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vimeo\.com/(?:video/)?(\d+)").unwrap());

/// A video URL reduced to the platform identifier needed to check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRef {
    YouTube(String),
    Vimeo(String),
    /// A YouTube search-results page rather than a single video.
    YouTubeSearch,
}

impl VideoRef {
    /// Classify `url`, returning `None` when no platform identifier can be found.
    pub fn parse(url: &str) -> Option<Self> {
        if url.contains("youtube.com/results") && url.contains("search_query=") {
            return Some(Self::YouTubeSearch);
        }
        if let Some(caps) = YOUTUBE_ID.captures(url) {
            return Some(Self::YouTube(caps[1].to_string()));
        }
        VIMEO_ID
            .captures(url)
            .map(|caps| Self::Vimeo(caps[1].to_string()))
    }

    pub fn youtube_watch_url(id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", id)
    }
}

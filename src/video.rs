use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

// Case-sensitive and anchored at the start only, so extra query parameters
// after the id are fine and an overlong id contributes its first 11 chars.
static WATCH_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://(?:www\.)?youtube\.com/watch\?v=([0-9A-Za-z_-]{11})").unwrap()
});

#[derive(Debug, thiserror::Error)]
#[error("This is not a valid YouTube URL.")]
pub struct InvalidWatchUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn from_watch_url(url: &str) -> Result<Self, InvalidWatchUrl> {
        WATCH_URL
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|id| VideoId(id.as_str().to_string()))
            .ok_or_else(|| InvalidWatchUrl {
                url: url.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

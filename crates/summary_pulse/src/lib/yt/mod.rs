//! # Video URL validation
//!
//! Recognizes hosted-video (YouTube) URLs and extracts a stable video id from
//! them. Pure string matching; nothing here touches the network.

use std::sync::LazyLock;

use regex::Regex;

use crate::{error::ValidationError, types::VideoReference};

/// scheme optional, `www.` optional, host required, non-empty path required
static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?(?:youtube\.com|youtu\.be)/.+$").unwrap()
});

/// Tried in order; the first pattern with a capture wins.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#/]+)",
        r"youtube\.com/(?:shorts|live|v)/([^&\n?#/]+)",
        r"youtube\.com/watch\?(?:[^#]*&)?v=([^&\n?#]+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Validates `raw_url` and extracts its video id.
///
/// # Errors
/// * [`ValidationError::InvalidUrl`] when the string is not a recognized
///   video URL (including the empty string).
/// * [`ValidationError::IdExtraction`] when the URL is well formed but no
///   id pattern matches it, e.g. a channel page.
#[tracing::instrument(level = "debug")]
pub fn validate(raw_url: &str) -> Result<VideoReference, ValidationError> {
    let raw_url = raw_url.trim();

    if !VIDEO_URL_RE.is_match(raw_url) {
        return Err(ValidationError::InvalidUrl(raw_url.to_string()));
    }

    let video_id = extract_video_id(raw_url)
        .ok_or_else(|| ValidationError::IdExtraction(raw_url.to_string()))?;

    Ok(VideoReference {
        raw_url: raw_url.to_string(),
        video_id: video_id.to_string(),
    })
}

fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url).and_then(|cap| cap.get(1)))
        .map(|m| m.as_str())
}

//! URL classification helpers.
//!
//! The backend rejects channel URLs on the single-download endpoint and
//! vice versa, so the client classifies URLs up front to route requests
//! (and to surface a useful error before a round trip).

use regex::Regex;
use std::sync::OnceLock;

use crate::types::Platform;

fn channel_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // YouTube channel forms
            r"/channel/",
            r"/c/",
            r"/user/",
            r"/@[\w-]+(?:/?\?.*)?$",
            // TikTok / Douyin profile forms
            r"/@[\w.-]+(?:/?\?.*)?$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
    })
}

/// Detect the platform a video or channel URL belongs to.
pub fn detect_platform(url: &str) -> Option<Platform> {
    let url = url.trim().to_lowercase();

    if url.contains("youtube.com") || url.contains("youtu.be") || url.contains("youtube-nocookie.com")
    {
        Some(Platform::Youtube)
    } else if url.contains("tiktok.com") {
        Some(Platform::Tiktok)
    } else if url.contains("douyin.com") || url.contains("iesdouyin.com") {
        Some(Platform::Douyin)
    } else {
        None
    }
}

/// Whether a URL points at a channel/profile rather than a single video.
pub fn is_channel_url(url: &str) -> bool {
    let url = url.to_lowercase();
    channel_patterns().iter().any(|p| p.is_match(&url))
}

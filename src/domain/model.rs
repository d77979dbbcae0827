use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// 搜尋服務每頁最多回傳的筆數
pub const MAX_VIDEO_COUNT: u32 = 50;

/// 一次產生 mashup 的輸入參數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MashupRequest {
    pub singer: String,
    pub video_count: u32,
    pub clip_seconds: u64,
    pub output_file: PathBuf,
    pub recipient: String,
}

impl MashupRequest {
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            text: format!("{} songs", self.singer.trim()),
            max_results: self.video_count,
        }
    }

    pub fn clip_duration(&self) -> Duration {
        Duration::from_secs(self.clip_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl VideoId {
    /// 接受單純的 id 或是含有 id 的網址
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if is_video_id(input) {
            return Some(Self(input.to_string()));
        }
        Self::from_url(input)
    }

    pub fn from_url(url: &str) -> Option<Self> {
        static ID_RE: OnceLock<Regex> = OnceLock::new();
        let re = ID_RE
            .get_or_init(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("video id pattern is valid"));

        re.captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    pub attempted: usize,
    pub succeeded: Vec<(VideoId, PathBuf)>,
    pub failed: Vec<(VideoId, String)>,
}

impl DownloadReport {
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.succeeded.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MashupOutcome {
    pub output_file: PathBuf,
    pub downloads: DownloadReport,
    pub merged_clips: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

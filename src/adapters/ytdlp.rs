use crate::core::{VideoFetcher, VideoId};
use crate::utils::error::{MashupError, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// 單一檔案中最高畫質，優先 mp4
const BEST_SINGLE_FILE: &str = "b[ext=mp4]/b";
/// yt-dlp 預設的命名方式
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

pub struct YtDlpFetcher {
    binary: String,
}

impl YtDlpFetcher {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn args(id: &VideoId, dest_dir: &Path) -> Vec<String> {
        vec![
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "-f".to_string(),
            BEST_SINGLE_FILE.to_string(),
            "--remux-video".to_string(),
            "mp4".to_string(),
            "-P".to_string(),
            dest_dir.display().to_string(),
            "-o".to_string(),
            OUTPUT_TEMPLATE.to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            id.watch_url(),
        ]
    }
}

#[async_trait::async_trait]
impl VideoFetcher for YtDlpFetcher {
    async fn fetch(&self, id: &VideoId, dest_dir: &Path) -> Result<PathBuf> {
        let output = Command::new(&self.binary)
            .args(Self::args(id, dest_dir))
            .output()
            .await
            .map_err(|e| MashupError::DownloadError {
                video_id: id.to_string(),
                message: format!("could not run {}: {}", self.binary, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MashupError::DownloadError {
                video_id: id.to_string(),
                message: stderr.trim().lines().last().unwrap_or("unknown error").to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| MashupError::DownloadError {
                video_id: id.to_string(),
                message: "yt-dlp did not report an output file".to_string(),
            })?;

        Ok(path)
    }
}

use crate::core::MediaProcessor;
use crate::utils::error::{MashupError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

/// 透過 ffmpeg/ffprobe 完成轉檔、裁切、串接
pub struct FfmpegProcessor {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegProcessor {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    async fn run(&self, binary: &str, args: &[&str]) -> Result<Vec<u8>> {
        tracing::debug!("Running {} {}", binary, args.join(" "));

        let output = Command::new(binary)
            .args(args)
            .output()
            .await
            .map_err(|e| MashupError::media(binary, format!("could not start: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.trim().lines().rev().take(3).collect();
            let message = tail.into_iter().rev().collect::<Vec<_>>().join(" | ");
            return Err(MashupError::media(binary, message));
        }

        Ok(output.stdout)
    }

    async fn run_ffmpeg(&self, args: &[&str]) -> Result<()> {
        let mut full = vec!["-hide_banner", "-loglevel", "error", "-nostdin"];
        full.extend_from_slice(args);
        self.run(&self.ffmpeg, &full).await.map(|_| ())
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| MashupError::media("ffmpeg", format!("non UTF-8 path: {}", path.display())))
}

/// 裁切用的暫存檔：`a.mp3` -> `a.mp3.part`，副檔名不是 mp3，不會被掃成音訊片段
fn trim_temp_path(audio: &Path) -> PathBuf {
    let mut name = audio.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// concat demuxer 的清單格式，單引號需跳脫
fn concat_list(clips: &[PathBuf]) -> Result<String> {
    let mut list = String::new();
    for clip in clips {
        let abs = std::path::absolute(clip)?;
        let escaped = path_str(&abs)?.replace('\'', r"'\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    Ok(list)
}

#[async_trait::async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn extract_audio(&self, video: &Path, audio: &Path) -> Result<()> {
        tracing::debug!("Extracting audio: {} -> {}", video.display(), audio.display());
        self.run_ffmpeg(&[
            "-i",
            path_str(video)?,
            "-vn",
            "-c:a",
            "libmp3lame",
            "-q:a",
            "2",
            "-y",
            path_str(audio)?,
        ])
        .await
    }

    async fn trim(&self, audio: &Path, duration: Duration) -> Result<()> {
        // ffmpeg 不能原地覆寫，先寫暫存檔再換名
        let tmp = trim_temp_path(audio);
        let secs = format!("{:.3}", duration.as_secs_f64());

        let result = self
            .run_ffmpeg(&[
                "-i",
                path_str(audio)?,
                "-ss",
                "0",
                "-t",
                &secs,
                "-vn",
                "-c:a",
                "libmp3lame",
                "-q:a",
                "2",
                "-f",
                "mp3",
                "-y",
                path_str(&tmp)?,
            ])
            .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }

        tokio::fs::rename(&tmp, audio).await?;
        Ok(())
    }

    async fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()> {
        let list_path = output.with_extension("concat.txt");
        tokio::fs::write(&list_path, concat_list(clips)?).await?;

        let result = self
            .run_ffmpeg(&[
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                path_str(&list_path)?,
                "-vn",
                "-c:a",
                "libmp3lame",
                "-q:a",
                "2",
                "-y",
                path_str(output)?,
            ])
            .await;

        let _ = tokio::fs::remove_file(&list_path).await;
        result
    }

    async fn duration(&self, media: &Path) -> Result<Duration> {
        let stdout = self
            .run(
                &self.ffprobe,
                &[
                    "-v",
                    "quiet",
                    "-print_format",
                    "json",
                    "-show_format",
                    path_str(media)?,
                ],
            )
            .await?;

        let probe: serde_json::Value = serde_json::from_slice(&stdout)?;
        let seconds = probe["format"]["duration"]
            .as_str()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| {
                MashupError::media(&self.ffprobe, format!("no duration for {}", media.display()))
            })?;

        Ok(Duration::from_secs_f64(seconds))
    }
}

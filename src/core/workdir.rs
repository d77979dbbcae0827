use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// yt-dlp 可能留下的影片容器
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov"];
pub const AUDIO_EXTENSION: &str = "mp3";

/// 各階段之間唯一共享的狀態：一個資料夾
#[derive(Debug, Clone)]
pub struct WorkDir {
    root: PathBuf,
}

impl WorkDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_exists(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub async fn scan(&self, extension: &str, exclude: &[&Path]) -> Result<Vec<PathBuf>> {
        self.scan_any(&[extension], exclude).await
    }

    /// 列出符合任一副檔名的檔案，依檔名排序，並排除 `exclude` 裡的路徑
    pub async fn scan_any(&self, extensions: &[&str], exclude: &[&Path]) -> Result<Vec<PathBuf>> {
        let excluded: Vec<PathBuf> = exclude
            .iter()
            .filter_map(|p| std::path::absolute(p).ok())
            .collect();

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)));
            if !matches {
                continue;
            }
            if let Ok(abs) = std::path::absolute(&path) {
                if excluded.contains(&abs) {
                    continue;
                }
            }
            files.push(path);
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// 執行前就已存在的影音檔，會被混進這次的結果
    pub async fn leftover_media(&self, exclude: &[&Path]) -> Result<Vec<PathBuf>> {
        let mut files = self.scan_any(VIDEO_EXTENSIONS, exclude).await?;
        files.extend(self.scan(AUDIO_EXTENSION, exclude).await?);
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_filters_by_extension_and_sorts() {
        let temp = TempDir::new().unwrap();
        for name in ["b.mp3", "a.mp3", "c.MP3", "video.mp4", "notes.txt", "a.mp3.part"] {
            std::fs::write(temp.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(temp.path().join("dir.mp3")).unwrap();

        let workdir = WorkDir::new(temp.path());
        let audio = workdir.scan(AUDIO_EXTENSION, &[]).await.unwrap();

        let names: Vec<_> = audio
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.mp3", "c.MP3"]);
    }

    #[tokio::test]
    async fn test_scan_any_collects_every_video_container() {
        let temp = TempDir::new().unwrap();
        for name in ["b.webm", "a.mp4", "c.mkv", "d.mp3"] {
            std::fs::write(temp.path().join(name), b"x").unwrap();
        }

        let workdir = WorkDir::new(temp.path());
        let videos = workdir.scan_any(VIDEO_EXTENSIONS, &[]).await.unwrap();

        assert_eq!(
            videos,
            vec![
                temp.path().join("a.mp4"),
                temp.path().join("b.webm"),
                temp.path().join("c.mkv"),
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_excludes_output_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("clip.mp3"), b"x").unwrap();
        std::fs::write(temp.path().join("mashup.mp3"), b"x").unwrap();

        let workdir = WorkDir::new(temp.path());
        let output = temp.path().join("mashup.mp3");
        let audio = workdir.scan(AUDIO_EXTENSION, &[output.as_path()]).await.unwrap();

        assert_eq!(audio, vec![temp.path().join("clip.mp3")]);
    }

    #[tokio::test]
    async fn test_leftover_media_reports_both_kinds() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("old.mp4"), b"x").unwrap();
        std::fs::write(temp.path().join("old.webm"), b"x").unwrap();
        std::fs::write(temp.path().join("old.mp3"), b"x").unwrap();
        std::fs::write(temp.path().join("old.mp3.part"), b"x").unwrap();

        let workdir = WorkDir::new(temp.path());
        assert_eq!(workdir.leftover_media(&[]).await.unwrap().len(), 3);
    }
}

use crate::domain::model::{DownloadReport, SearchQuery, VideoId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoId>>;
}

#[async_trait]
pub trait VideoFetcher: Send + Sync {
    /// 下載最高畫質的串流到 `dest_dir`，回傳實際寫入的檔案
    async fn fetch(&self, id: &VideoId, dest_dir: &Path) -> Result<PathBuf>;
}

#[async_trait]
pub trait MediaProcessor: Send + Sync {
    async fn extract_audio(&self, video: &Path, audio: &Path) -> Result<()>;
    /// 只保留前 `duration`，覆寫原檔
    async fn trim(&self, audio: &Path, duration: Duration) -> Result<()>;
    async fn concat(&self, clips: &[PathBuf], output: &Path) -> Result<()>;
    async fn duration(&self, media: &Path) -> Result<Duration>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, output_file: &Path) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn prepare(&self) -> Result<()>;
    async fn search(&self) -> Result<Vec<VideoId>>;
    async fn download(&self, ids: Vec<VideoId>) -> Result<DownloadReport>;
    async fn transcode(&self) -> Result<Vec<PathBuf>>;
    async fn trim(&self) -> Result<Vec<PathBuf>>;
    async fn merge(&self) -> Result<(PathBuf, usize)>;
    async fn notify(&self, output_file: &Path) -> Result<()>;
}

use crate::core::workdir::{WorkDir, AUDIO_EXTENSION, VIDEO_EXTENSIONS};
use crate::core::{
    DownloadReport, MashupRequest, MediaProcessor, Notifier, Pipeline, VideoFetcher, VideoId,
    VideoSearch,
};
use crate::utils::error::{MashupError, Result};
use std::path::{Path, PathBuf};

pub struct MashupPipeline<S, F, M, N>
where
    S: VideoSearch,
    F: VideoFetcher,
    M: MediaProcessor,
    N: Notifier,
{
    search: S,
    fetcher: F,
    media: M,
    notifier: N,
    request: MashupRequest,
    workdir: WorkDir,
}

impl<S, F, M, N> MashupPipeline<S, F, M, N>
where
    S: VideoSearch,
    F: VideoFetcher,
    M: MediaProcessor,
    N: Notifier,
{
    pub fn new(
        search: S,
        fetcher: F,
        media: M,
        notifier: N,
        request: MashupRequest,
        workdir: WorkDir,
    ) -> Self {
        Self {
            search,
            fetcher,
            media,
            notifier,
            request,
            workdir,
        }
    }

    pub fn request(&self) -> &MashupRequest {
        &self.request
    }

    pub fn workdir(&self) -> &WorkDir {
        &self.workdir
    }

    async fn audio_clips(&self) -> Result<Vec<PathBuf>> {
        self.workdir
            .scan(AUDIO_EXTENSION, &[self.request.output_file.as_path()])
            .await
    }
}

#[async_trait::async_trait]
impl<S, F, M, N> Pipeline for MashupPipeline<S, F, M, N>
where
    S: VideoSearch,
    F: VideoFetcher,
    M: MediaProcessor,
    N: Notifier,
{
    async fn prepare(&self) -> Result<()> {
        self.workdir.ensure_exists().await?;

        let leftovers = self
            .workdir
            .leftover_media(&[self.request.output_file.as_path()])
            .await?;
        if !leftovers.is_empty() {
            tracing::warn!(
                "⚠️ {} media file(s) already in {} will be included in this mashup",
                leftovers.len(),
                self.workdir.path().display()
            );
            for file in &leftovers {
                tracing::debug!("Leftover file: {}", file.display());
            }
        }
        Ok(())
    }

    async fn search(&self) -> Result<Vec<VideoId>> {
        let query = self.request.search_query();
        tracing::info!(
            "🔎 Searching {} videos of {} ...",
            query.max_results,
            self.request.singer
        );

        let ids = self.search.search(&query).await?;
        tracing::debug!("Search returned {} video ids", ids.len());
        Ok(ids)
    }

    async fn download(&self, ids: Vec<VideoId>) -> Result<DownloadReport> {
        let mut report = DownloadReport::default();

        for (i, id) in ids.into_iter().enumerate() {
            report.attempted += 1;
            tracing::info!("⬇️ Downloading video {} - ID: {}", i + 1, id);

            match self.fetcher.fetch(&id, self.workdir.path()).await {
                Ok(path) => {
                    tracing::debug!("Saved {} to {}", id, path.display());
                    report.succeeded.push((id, path));
                }
                Err(e) => {
                    // 單支影片失敗不中斷整個流程
                    tracing::error!("❌ Error downloading video {}: {}", i + 1, e);
                    report.failed.push((id, e.to_string()));
                }
            }
        }

        tracing::info!(
            "Downloaded {}/{} videos",
            report.succeeded.len(),
            report.attempted
        );
        Ok(report)
    }

    async fn transcode(&self) -> Result<Vec<PathBuf>> {
        tracing::info!("🎵 Converting videos to audio...");

        let videos = self.workdir.scan_any(VIDEO_EXTENSIONS, &[]).await?;
        let mut audio_files = Vec::with_capacity(videos.len());
        for video in videos {
            let audio = video.with_extension(AUDIO_EXTENSION);
            self.media.extract_audio(&video, &audio).await?;
            audio_files.push(audio);
        }
        Ok(audio_files)
    }

    async fn trim(&self) -> Result<Vec<PathBuf>> {
        tracing::info!(
            "✂️ Cutting first {} seconds from all downloaded audios...",
            self.request.clip_seconds
        );

        let clips = self.audio_clips().await?;
        for clip in &clips {
            self.media.trim(clip, self.request.clip_duration()).await?;
        }
        Ok(clips)
    }

    async fn merge(&self) -> Result<(PathBuf, usize)> {
        tracing::info!("🔗 Merging all audios into a single output file...");

        let clips = self.audio_clips().await?;
        if clips.is_empty() {
            return Err(MashupError::NoClipsError {
                dir: self.workdir.path().display().to_string(),
            });
        }

        let output = self.request.output_file.clone();
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.media.concat(&clips, &output).await?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            match self.media.duration(&output).await {
                Ok(d) => tracing::debug!("Mashup duration: {:.1}s", d.as_secs_f64()),
                Err(e) => tracing::debug!("Could not probe mashup duration: {}", e),
            }
        }

        Ok((output, clips.len()))
    }

    async fn notify(&self, output_file: &Path) -> Result<()> {
        tracing::info!("📧 Sending notification to {}", self.request.recipient);
        self.notifier
            .notify(&self.request.recipient, output_file)
            .await?;
        tracing::info!("✅ Email sent successfully!");
        Ok(())
    }
}

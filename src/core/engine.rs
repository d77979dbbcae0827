use crate::core::{MashupOutcome, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::StageMonitor;

pub struct MashupEngine<P: Pipeline> {
    pipeline: P,
    monitor: StageMonitor,
}

impl<P: Pipeline> MashupEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: StageMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行五個階段，任何下載以外的錯誤都會直接中止
    pub async fn run(&self) -> Result<MashupOutcome> {
        let started_at = chrono::Utc::now();
        tracing::info!("🚀 Starting mashup run");

        self.pipeline.prepare().await?;

        let ids = self.pipeline.search().await?;
        let _ = self.monitor.mark("search");

        let downloads = self.pipeline.download(ids).await?;
        let _ = self.monitor.mark("download");
        if downloads.all_failed() {
            tracing::warn!("⚠️ Every download failed; continuing with files already on disk");
        }

        let audio = self.pipeline.transcode().await?;
        tracing::debug!("Transcoded {} videos", audio.len());
        let _ = self.monitor.mark("transcode");

        self.pipeline.trim().await?;
        let (output_file, merged_clips) = self.pipeline.merge().await?;
        let _ = self.monitor.mark("trim & merge");

        self.pipeline.notify(&output_file).await?;
        let _ = self.monitor.mark("notify");

        self.monitor.log_final_stats();

        Ok(MashupOutcome {
            output_file,
            downloads,
            merged_clips,
            started_at,
            finished_at: chrono::Utc::now(),
        })
    }
}

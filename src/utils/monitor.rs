#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct StageStats {
    pub stage: String,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub stage_time: Duration,
    pub total_time: Duration,
}

/// 每個階段結束時記錄耗時與記憶體用量
#[cfg(feature = "cli")]
pub struct StageMonitor {
    inner: Option<MonitorState>,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: Mutex<System>,
    pid: Pid,
    started: Instant,
    last_mark: Mutex<Instant>,
    peak_memory_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl StageMonitor {
    pub fn new(enabled: bool) -> Self {
        let inner = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let now = Instant::now();
                    Some(MonitorState {
                        system: Mutex::new(System::new()),
                        pid,
                        started: now,
                        last_mark: Mutex::new(now),
                        peak_memory_mb: Mutex::new(0),
                    })
                }
                Err(e) => {
                    tracing::warn!("⚠️ Stage monitoring disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self { inner }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// 記錄一個階段完成，回傳該階段的統計
    pub fn mark(&self, stage: &str) -> Option<StageStats> {
        let state = self.inner.as_ref()?;

        let memory_mb = {
            let mut system = state.system.lock().ok()?;
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[state.pid]),
                true,
                ProcessRefreshKind::nothing().with_memory(),
            );
            system.process(state.pid)?.memory() / 1024 / 1024
        };

        let peak_memory_mb = {
            let mut peak = state.peak_memory_mb.lock().ok()?;
            *peak = (*peak).max(memory_mb);
            *peak
        };

        let now = Instant::now();
        let stage_time = {
            let mut last = state.last_mark.lock().ok()?;
            let elapsed = now.duration_since(*last);
            *last = now;
            elapsed
        };

        let stats = StageStats {
            stage: stage.to_string(),
            memory_mb,
            peak_memory_mb,
            stage_time,
            total_time: now.duration_since(state.started),
        };

        tracing::info!(
            "📊 {} - took {:?}, memory: {}MB, peak: {}MB",
            stats.stage,
            stats.stage_time,
            stats.memory_mb,
            stats.peak_memory_mb
        );

        Some(stats)
    }

    pub fn log_final_stats(&self) {
        if let Some(state) = &self.inner {
            let peak = state.peak_memory_mb.lock().map(|p| *p).unwrap_or(0);
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                state.started.elapsed(),
                peak
            );
        }
    }
}

#[cfg(feature = "cli")]
impl Default for StageMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 建置不帶 sysinfo
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct StageMonitor;

#[cfg(not(feature = "cli"))]
impl StageMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn mark(&self, _stage: &str) {}

    pub fn log_final_stats(&self) {}
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_records_nothing() {
        let monitor = StageMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert!(monitor.mark("search").is_none());
    }

    #[test]
    fn test_enabled_monitor_tracks_peak() {
        let monitor = StageMonitor::new(true);
        assert!(monitor.is_enabled());

        let first = monitor.mark("search").expect("stats for own process");
        let second = monitor.mark("download").expect("stats for own process");

        assert_eq!(second.stage, "download");
        assert!(second.peak_memory_mb >= first.memory_mb);
        assert!(second.total_time >= first.total_time);
    }
}

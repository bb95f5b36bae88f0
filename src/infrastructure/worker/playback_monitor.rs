//! Playback Monitor - 播放进度监视器
//!
//! 后台任务按固定间隔轮询播放句柄，驱动高亮游标前进，
//! 并通过 watch channel 广播最新状态。时长在播放器
//! 首次报告非零值时惰性捕获。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::PlaybackHandlePort;
use crate::domain::narration::{HighlightCursor, HighlightSpan, WordTiming};

/// 监视器配置
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
        }
    }
}

/// 单次轮询产出的播放状态快照
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackUpdate {
    /// 当前应高亮的词区间，无词命中时为 None
    pub highlight: Option<HighlightSpan>,
    /// 当前播放位置（秒）
    pub current_time: f64,
    /// 音频总时长（秒），捕获前为 None
    pub duration: Option<f64>,
}

/// 播放进度监视器
///
/// Drop 时自动停止后台任务。
pub struct PlaybackMonitor {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PlaybackMonitor {
    /// 启动监视任务，返回监视器与状态接收端
    pub fn spawn(
        playback: Arc<dyn PlaybackHandlePort>,
        timings: Vec<WordTiming>,
        config: MonitorConfig,
    ) -> (Self, watch::Receiver<PlaybackUpdate>) {
        let (tx, rx) = watch::channel(PlaybackUpdate::default());
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            run_monitor(playback, timings, config, tx, token).await;
        });

        (
            Self {
                cancel,
                handle: Some(handle),
            },
            rx,
        )
    }

    /// 主动停止监视
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// 等待监视任务自然结束
    pub async fn wait(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PlaybackMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_monitor(
    playback: Arc<dyn PlaybackHandlePort>,
    timings: Vec<WordTiming>,
    config: MonitorConfig,
    tx: watch::Sender<PlaybackUpdate>,
    cancel: CancellationToken,
) {
    let mut cursor = HighlightCursor::new(timings);
    let mut interval = tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
    let mut duration: Option<f64> = None;
    let mut was_playing = false;

    tracing::debug!(
        poll_interval_ms = config.poll_interval_ms,
        word_count = cursor.len(),
        "PlaybackMonitor started"
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("PlaybackMonitor cancelled");
                break;
            }
            _ = interval.tick() => {}
        }

        let playing = playback.is_playing();
        if playing {
            was_playing = true;
        } else if was_playing {
            // 播放结束后高亮归零，进度保持末次读数
            tx.send_modify(|update| update.highlight = None);
            tracing::debug!("Playback finished, monitor stopping");
            break;
        }

        // 播放器可能要过几个周期才知道时长
        if duration.is_none() {
            duration = playback.duration().filter(|d| *d > 0.0);
            if let Some(d) = duration {
                tracing::debug!(duration_secs = d, "Audio duration captured");
            }
        }

        let current_time = playback.position();
        let highlight = cursor.advance(current_time);

        let _ = tx.send(PlaybackUpdate {
            highlight,
            current_time,
            duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 按脚本逐次报告位置的假播放句柄
    struct ScriptedPlayback {
        positions: Vec<f64>,
        polls: AtomicUsize,
        /// 从第几次轮询开始报告时长
        duration_after: usize,
        duration: f64,
    }

    impl ScriptedPlayback {
        fn new(positions: Vec<f64>, duration_after: usize, duration: f64) -> Arc<Self> {
            Arc::new(Self {
                positions,
                polls: AtomicUsize::new(0),
                duration_after,
                duration,
            })
        }
    }

    impl PlaybackHandlePort for ScriptedPlayback {
        fn position(&self) -> f64 {
            let i = self.polls.fetch_add(1, Ordering::SeqCst);
            if i < self.positions.len() {
                self.positions[i]
            } else {
                *self.positions.last().unwrap_or(&0.0)
            }
        }

        fn duration(&self) -> Option<f64> {
            if self.polls.load(Ordering::SeqCst) >= self.duration_after {
                Some(self.duration)
            } else {
                None
            }
        }

        fn is_playing(&self) -> bool {
            self.polls.load(Ordering::SeqCst) <= self.positions.len()
        }
    }

    fn timings() -> Vec<WordTiming> {
        vec![
            WordTiming::new("Hello", 0.0, 0.4, 0, 5),
            WordTiming::new("world", 0.5, 0.9, 6, 11),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_runs_to_end_and_captures_duration() {
        let playback = ScriptedPlayback::new(vec![0.05, 0.55, 1.2], 2, 1.2);
        let (monitor, rx) =
            PlaybackMonitor::spawn(playback, timings(), MonitorConfig::default());

        monitor.wait().await;

        let last = rx.borrow().clone();
        assert_eq!(last.current_time, 1.2);
        assert_eq!(last.duration, Some(1.2));
        // 游标已走完全部词，末次轮询无高亮
        assert_eq!(last.highlight, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_highlights_current_word() {
        // 持续停留在第二个词内部，主动停止监视时高亮仍在
        let playback = ScriptedPlayback::new(vec![0.6; 100], 0, 1.2);
        let (monitor, rx) =
            PlaybackMonitor::spawn(playback, timings(), MonitorConfig::default());

        tokio::time::sleep(Duration::from_millis(350)).await;
        monitor.shutdown();
        monitor.wait().await;

        let last = rx.borrow().clone();
        assert_eq!(
            last.highlight,
            Some(HighlightSpan {
                start_index: 6,
                end_index: 11,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_cleared_when_playback_stops() {
        // 在第一个词中途停止播放：高亮归零，进度保持末次读数
        let playback = ScriptedPlayback::new(vec![0.2], 0, 1.2);
        let (monitor, rx) =
            PlaybackMonitor::spawn(playback, timings(), MonitorConfig::default());

        monitor.wait().await;

        let last = rx.borrow().clone();
        assert_eq!(last.highlight, None);
        assert_eq!(last.current_time, 0.2);
        assert_eq!(last.duration, Some(1.2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_endless_playback() {
        struct EndlessPlayback;
        impl PlaybackHandlePort for EndlessPlayback {
            fn position(&self) -> f64 {
                0.1
            }
            fn duration(&self) -> Option<f64> {
                None
            }
            fn is_playing(&self) -> bool {
                true
            }
        }

        let (monitor, _rx) = PlaybackMonitor::spawn(
            Arc::new(EndlessPlayback),
            timings(),
            MonitorConfig::default(),
        );

        tokio::time::sleep(Duration::from_millis(350)).await;
        monitor.shutdown();
        monitor.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_with_no_timings_reports_progress_only() {
        let playback = ScriptedPlayback::new(vec![0.2, 0.4], 0, 0.5);
        let (monitor, rx) =
            PlaybackMonitor::spawn(playback, Vec::new(), MonitorConfig::default());

        monitor.wait().await;

        let last = rx.borrow().clone();
        assert_eq!(last.highlight, None);
        assert_eq!(last.current_time, 0.4);
        assert_eq!(last.duration, Some(0.5));
    }
}

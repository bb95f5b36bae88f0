//! Rodio Playback - 基于 rodio sink 的播放句柄
//!
//! 实现 PlaybackHandlePort。`OutputStream` 不跨线程，
//! 由调用方（通常是 main）持有保活，本适配器只持有 Sink。

use rodio::{Decoder, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Mutex;
use thiserror::Error;

use crate::application::ports::PlaybackHandlePort;

/// 播放错误
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Audio decode error: {0}")]
    Decode(String),
}

/// Rodio 播放句柄
pub struct RodioPlayback {
    sink: Sink,
    /// 懒捕获的音频总时长（秒），解码器可知时在 append 时写入
    duration: Mutex<Option<f64>>,
}

impl RodioPlayback {
    pub fn new(handle: &OutputStreamHandle) -> Result<Self, PlaybackError> {
        let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        Ok(Self {
            sink,
            duration: Mutex::new(None),
        })
    }

    /// 解码并开始播放一段音频
    pub fn play(&self, audio: Vec<u8>) -> Result<(), PlaybackError> {
        let source =
            Decoder::new(Cursor::new(audio)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

        let total = source.total_duration().map(|d| d.as_secs_f64());
        *self.duration.lock().unwrap_or_else(|e| e.into_inner()) = total;

        self.sink.append(source);
        self.sink.play();

        tracing::info!(duration_secs = ?total, "Playback started");
        Ok(())
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn resume(&self) {
        self.sink.play();
    }

    pub fn stop(&self) {
        self.sink.stop();
    }
}

impl PlaybackHandlePort for RodioPlayback {
    fn position(&self) -> f64 {
        self.sink.get_pos().as_secs_f64()
    }

    fn duration(&self) -> Option<f64> {
        *self.duration.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_playing(&self) -> bool {
        !self.sink.empty() && !self.sink.is_paused()
    }
}

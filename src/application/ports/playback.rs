//! Playback Handle Port - 音频播放句柄抽象
//!
//! 播放设备是外部协作者，核心只读取它的位置、时长与播放状态。

/// Playback Handle Port
pub trait PlaybackHandlePort: Send + Sync {
    /// 当前播放位置（秒）
    fn position(&self) -> f64;

    /// 音频总时长（秒），尚不可知时为 None
    fn duration(&self) -> Option<f64>;

    /// 是否正在播放
    fn is_playing(&self) -> bool;
}

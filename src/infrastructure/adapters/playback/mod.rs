//! Playback Adapters - 音频播放实现

mod rodio_player;

pub use rodio_player::{PlaybackError, RodioPlayback};

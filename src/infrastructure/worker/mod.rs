//! Background Workers - 后台任务

mod playback_monitor;

pub use playback_monitor::{MonitorConfig, PlaybackMonitor, PlaybackUpdate};

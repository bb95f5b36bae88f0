//! Narration Context - 朗读上下文
//!
//! 词级时间轴与高亮游标（播放同步的纯逻辑部分）

mod cursor;
mod timing;

pub use cursor::HighlightCursor;
pub use timing::{HighlightSpan, SynthesisResult, WordTiming};

//! 领域层
//!
//! - Narration Context: 朗读与播放同步上下文
//! - Voice Context: 音色管理上下文

pub mod narration;
pub mod voice;

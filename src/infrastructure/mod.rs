//! Infrastructure Layer - 基础设施层
//!
//! 端口的具体实现：外部 TTS 服务、音频播放、sled 持久化、
//! 后台监视任务。

pub mod adapters;
pub mod persistence;
pub mod worker;

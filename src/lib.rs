//! Narrata - 文档朗读 TTS 核心
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Narration Context: 词时间轴、高亮游标、合成结果
//! - Voice Context: 克隆音色聚合与值对象
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechSynthesizer, VoiceCloning, VoiceStore, PlaybackHandle）
//! - Services: 音色库服务
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: ElevenLabs TTS 客户端、rodio 播放
//! - Persistence: Sled 音色库
//! - Worker: 播放进度监视器

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

//! 应用层
//!
//! - Ports: 端口定义（SpeechSynthesizer, VoiceCloning, VoiceStore, PlaybackHandle）
//! - Services: 用例编排（音色库管理）

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;

//! Voice Cloning Port - 音色克隆抽象
//!
//! 上传音频样本创建克隆音色、删除远端音色

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::VoiceId;

/// 音色克隆错误
#[derive(Debug, Error)]
pub enum VoiceCloneError {
    /// 配置无效（如无法解析的 base URL）
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// 传输层错误（含超时）
    #[error("Network error: {0}")]
    Network(String),

    /// 非 2xx HTTP 状态
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 响应缺少期望字段或无法解析
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Voice Cloning Port
#[async_trait]
pub trait VoiceCloningPort: Send + Sync {
    /// 上传音频样本，创建克隆音色
    ///
    /// 返回远端分配的音色 ID
    async fn clone_voice(
        &self,
        name: &str,
        description: &str,
        audio: Vec<u8>,
    ) -> Result<VoiceId, VoiceCloneError>;

    /// 删除远端音色
    async fn delete_voice(&self, id: &VoiceId) -> Result<(), VoiceCloneError>;
}

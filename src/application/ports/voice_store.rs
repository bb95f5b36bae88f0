//! Voice Store Port - 音色库持久化抽象
//!
//! 克隆音色列表与默认音色选择的本地 key-value 存储。
//! 往返必须精确：写入再读出得到相等的列表。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::{ClonedVoice, VoiceId};

/// 音色存储错误
#[derive(Debug, Error)]
pub enum VoiceStoreError {
    #[error("Voice not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Voice Store Port
#[async_trait]
pub trait VoiceStorePort: Send + Sync {
    /// 获取全部克隆音色
    async fn list(&self) -> Result<Vec<ClonedVoice>, VoiceStoreError>;

    /// 保存音色（同 ID 覆盖）
    async fn save(&self, voice: &ClonedVoice) -> Result<(), VoiceStoreError>;

    /// 删除音色
    async fn remove(&self, id: &VoiceId) -> Result<(), VoiceStoreError>;

    /// 当前默认音色，未设置过时为内置音色
    async fn default_voice(&self) -> Result<VoiceId, VoiceStoreError>;

    /// 设置默认音色（跨重启保持）
    async fn set_default_voice(&self, id: &VoiceId) -> Result<(), VoiceStoreError>;
}

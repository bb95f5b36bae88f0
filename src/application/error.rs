//! 应用层错误定义
//!
//! 统一的服务编排错误类型

use thiserror::Error;

use crate::application::ports::{VoiceCloneError, VoiceStoreError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<VoiceCloneError> for ApplicationError {
    fn from(err: VoiceCloneError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<VoiceStoreError> for ApplicationError {
    fn from(err: VoiceStoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}

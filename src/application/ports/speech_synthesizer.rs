//! Speech Synthesizer Port - 语音合成抽象
//!
//! 将 (文本, 音色 ID) 变为 (音频字节, 词级时间轴) 的远端调用。
//! 同一实例同时最多一个在途请求（single-flight），
//! 第二个请求立即失败而不是排队或竞争。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::narration::SynthesisResult;

/// 语音合成错误
///
/// 所有错误对产生它的调用都是终态，核心不做任何自动重试。
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// 已有请求在途，本次调用未发起任何网络操作
    #[error("Synthesis already in progress")]
    AlreadyInProgress,

    /// 配置无效（如无法解析的 base URL）
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// 传输层错误（含超时）
    #[error("Network error: {0}")]
    Network(String),

    /// 非 2xx HTTP 状态
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 后端上报的应用级错误（响应中的 `detail` 字段）
    #[error("API error: {0}")]
    Api(String),

    /// 响应解码失败（JSON 或 base64 音频）
    #[error("Decode error: {0}")]
    Decode(String),

    /// 请求被取消，未交付任何部分结果
    #[error("Synthesis cancelled")]
    Cancelled,
}

/// Speech Synthesizer Port
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// 合成一段文本
    ///
    /// 空文本不做防御性拦截，原样转发给后端。
    /// 已有请求在途时立即返回 [`SynthesisError::AlreadyInProgress`]。
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<SynthesisResult, SynthesisError>;

    /// 取消在途请求
    ///
    /// 中止传输层调用并立即释放在途标记，使新的 `synthesize`
    /// 可以开始。被取消的调用以 [`SynthesisError::Cancelled`] 结束，
    /// 绝不覆盖后续请求写入的状态。空闲时调用是幂等的 no-op。
    fn cancel(&self);
}

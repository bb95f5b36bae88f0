//! Fake Speech Client - 用于测试与离线开发的合成客户端
//!
//! 始终返回固定的音频与时间轴，不实际调用远端服务

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{SpeechSynthesizerPort, SynthesisError};
use crate::domain::narration::{SynthesisResult, WordTiming};

/// Fake Speech Client 配置
#[derive(Debug, Clone)]
pub struct FakeSpeechClientConfig {
    /// 固定返回的音频数据
    pub audio: Vec<u8>,
    /// 固定返回的时间轴
    pub timings: Vec<WordTiming>,
    /// 模拟的合成延迟
    pub latency: Duration,
}

impl Default for FakeSpeechClientConfig {
    fn default() -> Self {
        Self {
            audio: vec![0u8; 1024],
            timings: Vec::new(),
            latency: Duration::from_millis(200),
        }
    }
}

/// Fake Speech Client
pub struct FakeSpeechClient {
    config: FakeSpeechClientConfig,
}

impl FakeSpeechClient {
    pub fn new(config: FakeSpeechClientConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeSpeechClientConfig::default())
    }
}

#[async_trait]
impl SpeechSynthesizerPort for FakeSpeechClient {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<SynthesisResult, SynthesisError> {
        tracing::debug!(
            text_len = text.len(),
            voice_id = %voice_id,
            "FakeSpeechClient: returning fixed audio"
        );

        tokio::time::sleep(self.config.latency).await;

        Ok(SynthesisResult::new(
            self.config.audio.clone(),
            self.config.timings.clone(),
        ))
    }

    fn cancel(&self) {}
}

//! ElevenLabs Speech Client - 调用 ElevenLabs TTS HTTP 服务
//!
//! 实现 SpeechSynthesizerPort 与 VoiceCloningPort
//!
//! 外部 API:
//! POST {base}/text-to-speech/{voice_id}  (JSON)
//! Response: `audio/*` 裸音频，或 JSON envelope
//!   `{"audio": base64, "word_timings"?: [...], "detail"?: string}`
//! POST {base}/voices/add                 (multipart → `{"voice_id"}`)
//! DELETE {base}/voices/{id}

use async_trait::async_trait;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    SpeechSynthesizerPort, SynthesisError, VoiceCloneError, VoiceCloningPort,
};
use crate::domain::narration::{SynthesisResult, WordTiming};
use crate::domain::voice::VoiceId;

/// 请求体中固定的合成模型
const MODEL_ID: &str = "eleven_monolingual_v1";

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// API key（`xi-api-key` 请求头）
    pub api_key: String,
    /// 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ElevenLabs 客户端
///
/// 实例自持在途状态（busy 标记 + 取消令牌），
/// 不依赖任何进程级单例。
pub struct ElevenLabsClient {
    http: Client,
    config: ElevenLabsConfig,
    busy: AtomicBool,
    in_flight: Mutex<Option<CancellationToken>>,
}

/// 在途标记的 RAII 守卫
///
/// 除 cancel 路径（标记已由 `cancel()` 释放）外，
/// 所有退出路径都经由 Drop 释放标记。
struct FlightGuard<'a> {
    busy: &'a AtomicBool,
    armed: bool,
}

impl FlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.busy.store(false, Ordering::Release);
        }
    }
}

impl ElevenLabsClient {
    /// 创建新的 ElevenLabs 客户端
    pub fn new(config: ElevenLabsConfig) -> Result<Self, SynthesisError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Network(e.to_string()))?;

        Ok(Self {
            http,
            config,
            busy: AtomicBool::new(false),
            in_flight: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, String> {
        let raw = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| format!("invalid URL {}: {}", raw, e))
    }

    async fn execute_synthesis(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<SynthesisResult, SynthesisError> {
        let url = self
            .endpoint(&format!("text-to-speech/{}", voice_id))
            .map_err(SynthesisError::InvalidConfiguration)?;

        let body = SynthesisRequestBody {
            text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.5,
            },
        };

        tracing::debug!(
            url = %url,
            voice_id = %voice_id,
            text_len = text.len(),
            "Sending synthesis request"
        );

        let response = self
            .http
            .post(url)
            .header("xi-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Network(format!("Request timed out: {}", e))
                } else if e.is_connect() {
                    SynthesisError::Network(format!("Cannot connect to synthesis service: {}", e))
                } else {
                    SynthesisError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Network(format!("Failed to read response body: {}", e)))?;

        let result = parse_synthesis_response(content_type.as_deref(), &bytes)?;

        tracing::info!(
            audio_size = result.audio.len(),
            word_timings = result.timings.len(),
            "Synthesis completed"
        );

        Ok(result)
    }

    fn take_in_flight(&self) -> Option<CancellationToken> {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    fn set_in_flight(&self, token: CancellationToken) {
        *self.in_flight.lock().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }
}

#[async_trait]
impl SpeechSynthesizerPort for ElevenLabsClient {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<SynthesisResult, SynthesisError> {
        // single-flight: 在途时立即失败，不发起网络调用
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SynthesisError::AlreadyInProgress);
        }
        let guard = FlightGuard {
            busy: &self.busy,
            armed: true,
        };

        let token = CancellationToken::new();
        self.set_in_flight(token.clone());

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                // busy 标记已由 cancel() 释放
                guard.disarm();
                Err(SynthesisError::Cancelled)
            }
            result = self.execute_synthesis(text, voice_id) => {
                self.take_in_flight();
                drop(guard);
                result
            }
        }
    }

    fn cancel(&self) {
        if let Some(token) = self.take_in_flight() {
            token.cancel();
            self.busy.store(false, Ordering::Release);
            tracing::info!("Synthesis cancelled");
        }
    }
}

#[async_trait]
impl VoiceCloningPort for ElevenLabsClient {
    async fn clone_voice(
        &self,
        name: &str,
        description: &str,
        audio: Vec<u8>,
    ) -> Result<VoiceId, VoiceCloneError> {
        let url = self
            .endpoint("voices/add")
            .map_err(VoiceCloneError::InvalidConfiguration)?;

        let sample = Part::bytes(audio)
            .file_name("voice_sample.mp3")
            .mime_str("audio/mpeg")
            .map_err(|e| VoiceCloneError::InvalidConfiguration(e.to_string()))?;
        let form = Form::new()
            .text("name", name.to_string())
            .text("description", description.to_string())
            .part("files", sample);

        tracing::debug!(name = %name, "Sending voice clone request");

        let response = self
            .http
            .post(url)
            .header("xi-api-key", &self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceCloneError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceCloneError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CloneVoiceResponse = response
            .json()
            .await
            .map_err(|e| VoiceCloneError::InvalidResponse(format!("Missing voice_id: {}", e)))?;

        tracing::info!(voice_id = %parsed.voice_id, "Voice clone created");
        Ok(VoiceId::new(parsed.voice_id))
    }

    async fn delete_voice(&self, id: &VoiceId) -> Result<(), VoiceCloneError> {
        let url = self
            .endpoint(&format!("voices/{}", id.as_str()))
            .map_err(VoiceCloneError::InvalidConfiguration)?;

        let response = self
            .http
            .delete(url)
            .header("xi-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| VoiceCloneError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceCloneError::Http {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(voice_id = %id, "Remote voice deleted");
        Ok(())
    }
}

// ============================================================================
// 请求/响应载荷
// ============================================================================

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
}

#[derive(Debug, Serialize)]
struct SynthesisRequestBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Deserialize)]
struct CloneVoiceResponse {
    voice_id: String,
}

/// JSON envelope 形态的合成响应
#[derive(Debug, Deserialize)]
struct SynthesisEnvelope {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    audio: Option<String>,
    #[serde(default)]
    word_timings: Vec<serde_json::Value>,
}

/// 成功响应的两种载荷形态
///
/// 按 content-type 区分，两条解析路径彼此独立。
#[derive(Debug)]
enum SynthesisPayload {
    /// `audio/*`：整个响应体即音频
    RawAudio(Vec<u8>),
    /// 其余情况按 JSON envelope 解析
    Envelope(SynthesisEnvelope),
}

fn classify_payload(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<SynthesisPayload, SynthesisError> {
    if content_type
        .map(|ct| ct.starts_with("audio/"))
        .unwrap_or(false)
    {
        return Ok(SynthesisPayload::RawAudio(body.to_vec()));
    }

    let envelope = serde_json::from_slice(body)
        .map_err(|e| SynthesisError::Decode(format!("Failed to parse JSON response: {}", e)))?;
    Ok(SynthesisPayload::Envelope(envelope))
}

fn parse_payload(payload: SynthesisPayload) -> Result<SynthesisResult, SynthesisError> {
    let envelope = match payload {
        SynthesisPayload::RawAudio(audio) => return Ok(SynthesisResult::raw_audio(audio)),
        SynthesisPayload::Envelope(envelope) => envelope,
    };

    if let Some(detail) = envelope.detail {
        return Err(SynthesisError::Api(detail));
    }

    let audio_b64 = envelope
        .audio
        .ok_or_else(|| SynthesisError::Decode("Audio field missing in JSON response".to_string()))?;
    let audio = base64::engine::general_purpose::STANDARD
        .decode(audio_b64.as_bytes())
        .map_err(|e| SynthesisError::Decode(format!("Invalid base64 audio: {}", e)))?;

    // 缺字段的条目静默丢弃，绝不导致整个调用失败
    let timings = envelope
        .word_timings
        .iter()
        .filter_map(|entry| {
            let timing = parse_word_timing(entry);
            if timing.is_none() {
                tracing::debug!(entry = %entry, "Dropping malformed word timing entry");
            }
            timing
        })
        .collect();

    Ok(SynthesisResult::new(audio, timings))
}

/// 解析单个时间轴条目，任一必需字段缺失或类型不符则丢弃
fn parse_word_timing(entry: &serde_json::Value) -> Option<WordTiming> {
    let word = entry.get("word")?.as_str()?;
    let start = entry.get("start")?.as_f64()?;
    let end = entry.get("end")?.as_f64()?;
    let start_index = entry.get("start_index")?.as_u64()?;
    let end_index = entry.get("end_index")?.as_u64()?;
    Some(WordTiming::new(
        word,
        start,
        end,
        start_index as usize,
        end_index as usize,
    ))
}

/// 解析 2xx 响应体
pub(crate) fn parse_synthesis_response(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<SynthesisResult, SynthesisError> {
    parse_payload(classify_payload(content_type, body)?)
}

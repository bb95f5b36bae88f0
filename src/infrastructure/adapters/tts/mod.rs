//! TTS Adapters - 语音合成客户端实现

mod elevenlabs;
mod fake;

pub use elevenlabs::{ElevenLabsClient, ElevenLabsConfig};
pub use fake::{FakeSpeechClient, FakeSpeechClientConfig};

//! Infrastructure Adapters

pub mod playback;
pub mod tts;

pub use playback::RodioPlayback;
pub use tts::{ElevenLabsClient, ElevenLabsConfig, FakeSpeechClient, FakeSpeechClientConfig};

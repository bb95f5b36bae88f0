//! Ports - 端口定义
//!
//! 应用核心与外部协作者之间的抽象接口，
//! 具体实现在 infrastructure 层

mod playback;
mod speech_synthesizer;
mod voice_cloning;
mod voice_store;

pub use playback::PlaybackHandlePort;
pub use speech_synthesizer::{SpeechSynthesizerPort, SynthesisError};
pub use voice_cloning::{VoiceCloneError, VoiceCloningPort};
pub use voice_store::{VoiceStoreError, VoiceStorePort};

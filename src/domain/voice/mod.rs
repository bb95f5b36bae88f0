//! Voice Context - 音色管理上下文

mod aggregate;
mod value_objects;

pub use aggregate::ClonedVoice;
pub use value_objects::{VoiceId, VoiceName, BUILT_IN_VOICE_ID};

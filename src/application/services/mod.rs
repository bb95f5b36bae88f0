//! Services - 用例编排

mod voice_library;

pub use voice_library::VoiceLibraryService;

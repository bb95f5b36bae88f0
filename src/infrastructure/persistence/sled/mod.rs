//! Sled-based Persistence

mod voice_store;

pub use voice_store::{SledVoiceStore, SledVoiceStoreConfig};

//! Sled-based Voice Store Implementation
//!
//! 固定 key 的 key-value 存储:
//! - `voices`        → bincode 编码的 Vec<ClonedVoice>
//! - `default_voice` → UTF-8 音色 ID
//!
//! 每次写入后 flush，保证克隆成功即持久。

use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{VoiceStoreError, VoiceStorePort};
use crate::domain::voice::{ClonedVoice, VoiceId};

const VOICES_KEY: &str = "voices";
const DEFAULT_VOICE_KEY: &str = "default_voice";

/// Sled 音色库配置
#[derive(Debug, Clone)]
pub struct SledVoiceStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledVoiceStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/voices.sled".to_string(),
        }
    }
}

/// Sled 音色库
pub struct SledVoiceStore {
    db: Db,
}

impl SledVoiceStore {
    /// 创建或打开音色库
    pub fn new(config: &SledVoiceStoreConfig) -> Result<Self, VoiceStoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| VoiceStoreError::DatabaseError(e.to_string()))?;

        tracing::info!(db_path = %config.db_path, "SledVoiceStore initialized");
        Ok(Self { db })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VoiceStoreError> {
        let config = SledVoiceStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn read_voices(&self) -> Result<Vec<ClonedVoice>, VoiceStoreError> {
        match self
            .db
            .get(VOICES_KEY)
            .map_err(|e| VoiceStoreError::DatabaseError(e.to_string()))?
        {
            Some(data) => bincode::deserialize(&data)
                .map_err(|e| VoiceStoreError::SerializationError(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn write_voices(&self, voices: &[ClonedVoice]) -> Result<(), VoiceStoreError> {
        let data = bincode::serialize(voices)
            .map_err(|e| VoiceStoreError::SerializationError(e.to_string()))?;
        self.db
            .insert(VOICES_KEY, data)
            .map_err(|e| VoiceStoreError::DatabaseError(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| VoiceStoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl VoiceStorePort for SledVoiceStore {
    async fn list(&self) -> Result<Vec<ClonedVoice>, VoiceStoreError> {
        self.read_voices()
    }

    async fn save(&self, voice: &ClonedVoice) -> Result<(), VoiceStoreError> {
        let mut voices = self.read_voices()?;
        voices.retain(|v| v.id() != voice.id());
        voices.push(voice.clone());
        self.write_voices(&voices)?;

        tracing::debug!(voice_id = %voice.id(), "Voice saved");
        Ok(())
    }

    async fn remove(&self, id: &VoiceId) -> Result<(), VoiceStoreError> {
        let mut voices = self.read_voices()?;
        let before = voices.len();
        voices.retain(|v| v.id() != id);
        if voices.len() == before {
            return Err(VoiceStoreError::NotFound(id.to_string()));
        }
        self.write_voices(&voices)?;

        tracing::debug!(voice_id = %id, "Voice removed");
        Ok(())
    }

    async fn default_voice(&self) -> Result<VoiceId, VoiceStoreError> {
        match self
            .db
            .get(DEFAULT_VOICE_KEY)
            .map_err(|e| VoiceStoreError::DatabaseError(e.to_string()))?
        {
            Some(data) => {
                let id = String::from_utf8(data.to_vec())
                    .map_err(|e| VoiceStoreError::SerializationError(e.to_string()))?;
                Ok(VoiceId::new(id))
            }
            None => Ok(VoiceId::built_in()),
        }
    }

    async fn set_default_voice(&self, id: &VoiceId) -> Result<(), VoiceStoreError> {
        self.db
            .insert(DEFAULT_VOICE_KEY, id.as_str().as_bytes())
            .map_err(|e| VoiceStoreError::DatabaseError(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| VoiceStoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::VoiceName;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> SledVoiceStore {
        SledVoiceStore::open(dir.path().join("test.sled")).unwrap()
    }

    fn voice(id: &str, name: &str) -> ClonedVoice {
        ClonedVoice::new(VoiceId::new(id), VoiceName::new(name).unwrap())
    }

    #[tokio::test]
    async fn test_empty_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_voice_list_round_trip_with_unicode_names() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let voices = vec![
            voice("v1", "Narrator"),
            voice("v2", "测试音色"),
            voice("v3", "Ñandú 🦜"),
        ];
        for v in &voices {
            store.save(v).await.unwrap();
        }

        assert_eq!(store.list().await.unwrap(), voices);
    }

    #[tokio::test]
    async fn test_save_same_id_overwrites() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&voice("v1", "Old")).await.unwrap();
        let renamed = voice("v1", "New");
        store.save(&renamed).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec![renamed]);
    }

    #[tokio::test]
    async fn test_remove_missing_voice_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let err = store.remove(&VoiceId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, VoiceStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_default_voice_falls_back_to_built_in() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.default_voice().await.unwrap(), VoiceId::built_in());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sled");
        let saved = voice("v1", "Narrator");

        {
            let store = SledVoiceStore::open(&path).unwrap();
            store.save(&saved).await.unwrap();
            store
                .set_default_voice(&VoiceId::new("v1"))
                .await
                .unwrap();
        }

        let store = SledVoiceStore::open(&path).unwrap();
        assert_eq!(store.list().await.unwrap(), vec![saved]);
        assert_eq!(
            store.default_voice().await.unwrap(),
            VoiceId::new("v1")
        );
    }
}

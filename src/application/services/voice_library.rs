//! Voice Library Service - 音色库用例编排
//!
//! 克隆音色（远端创建 + 立即本地持久化）、删除音色
//! （本地必删，远端删除可选）、默认音色选择。

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{VoiceCloningPort, VoiceStorePort};
use crate::domain::voice::{ClonedVoice, VoiceId, VoiceName};

/// 音色库服务
pub struct VoiceLibraryService {
    cloning: Arc<dyn VoiceCloningPort>,
    store: Arc<dyn VoiceStorePort>,
}

impl VoiceLibraryService {
    pub fn new(cloning: Arc<dyn VoiceCloningPort>, store: Arc<dyn VoiceStorePort>) -> Self {
        Self { cloning, store }
    }

    /// 克隆音色并立即持久化
    pub async fn clone_voice(
        &self,
        name: &str,
        description: &str,
        sample: Vec<u8>,
    ) -> Result<ClonedVoice, ApplicationError> {
        let name = VoiceName::new(name).map_err(ApplicationError::validation)?;

        let voice_id = self
            .cloning
            .clone_voice(name.as_str(), description, sample)
            .await?;

        let voice = ClonedVoice::new(voice_id, name);
        self.store.save(&voice).await?;

        tracing::info!(
            voice_id = %voice.id(),
            name = %voice.name(),
            "Voice cloned"
        );

        Ok(voice)
    }

    /// 删除音色
    ///
    /// 本地记录总是删除；`remote` 为 true 时随后发起远端删除。
    /// 远端删除失败会上报，但本地删除不回滚。
    pub async fn delete_voice(&self, id: &VoiceId, remote: bool) -> Result<(), ApplicationError> {
        self.store.remove(id).await?;

        if remote {
            self.cloning.delete_voice(id).await?;
        }

        tracing::info!(voice_id = %id, remote = remote, "Voice deleted");
        Ok(())
    }

    /// 获取全部克隆音色
    pub async fn list_voices(&self) -> Result<Vec<ClonedVoice>, ApplicationError> {
        Ok(self.store.list().await?)
    }

    /// 当前默认音色
    pub async fn default_voice(&self) -> Result<VoiceId, ApplicationError> {
        Ok(self.store.default_voice().await?)
    }

    /// 设置默认音色
    pub async fn set_default_voice(&self, id: &VoiceId) -> Result<(), ApplicationError> {
        self.store.set_default_voice(id).await?;
        tracing::info!(voice_id = %id, "Default voice updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::application::ports::{VoiceCloneError, VoiceStoreError};

    struct StubCloning {
        delete_calls: AtomicUsize,
    }

    impl StubCloning {
        fn new() -> Self {
            Self {
                delete_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VoiceCloningPort for StubCloning {
        async fn clone_voice(
            &self,
            _name: &str,
            _description: &str,
            _audio: Vec<u8>,
        ) -> Result<VoiceId, VoiceCloneError> {
            Ok(VoiceId::new("remote-voice-1"))
        }

        async fn delete_voice(&self, _id: &VoiceId) -> Result<(), VoiceCloneError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryVoiceStore {
        voices: Mutex<Vec<ClonedVoice>>,
        default: Mutex<Option<VoiceId>>,
    }

    #[async_trait]
    impl VoiceStorePort for MemoryVoiceStore {
        async fn list(&self) -> Result<Vec<ClonedVoice>, VoiceStoreError> {
            Ok(self.voices.lock().unwrap().clone())
        }

        async fn save(&self, voice: &ClonedVoice) -> Result<(), VoiceStoreError> {
            let mut voices = self.voices.lock().unwrap();
            voices.retain(|v| v.id() != voice.id());
            voices.push(voice.clone());
            Ok(())
        }

        async fn remove(&self, id: &VoiceId) -> Result<(), VoiceStoreError> {
            let mut voices = self.voices.lock().unwrap();
            let before = voices.len();
            voices.retain(|v| v.id() != id);
            if voices.len() == before {
                return Err(VoiceStoreError::NotFound(id.to_string()));
            }
            Ok(())
        }

        async fn default_voice(&self) -> Result<VoiceId, VoiceStoreError> {
            Ok(self
                .default
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(VoiceId::built_in))
        }

        async fn set_default_voice(&self, id: &VoiceId) -> Result<(), VoiceStoreError> {
            *self.default.lock().unwrap() = Some(id.clone());
            Ok(())
        }
    }

    fn service() -> (VoiceLibraryService, Arc<StubCloning>, Arc<MemoryVoiceStore>) {
        let cloning = Arc::new(StubCloning::new());
        let store = Arc::new(MemoryVoiceStore::default());
        (
            VoiceLibraryService::new(cloning.clone(), store.clone()),
            cloning,
            store,
        )
    }

    #[tokio::test]
    async fn test_clone_persists_immediately() {
        let (service, _, store) = service();

        let voice = service
            .clone_voice("My Voice", "Cloned voice", vec![0u8; 16])
            .await
            .unwrap();

        assert_eq!(voice.id().as_str(), "remote-voice-1");
        let stored = store.list().await.unwrap();
        assert_eq!(stored, vec![voice]);
    }

    #[tokio::test]
    async fn test_clone_rejects_invalid_name() {
        let (service, _, store) = service();

        let result = service.clone_voice("   ", "Cloned voice", vec![]).await;
        assert!(matches!(
            result,
            Err(ApplicationError::ValidationError(_))
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_local_only() {
        let (service, cloning, _) = service();
        let voice = service.clone_voice("V", "d", vec![]).await.unwrap();

        service.delete_voice(voice.id(), false).await.unwrap();

        assert!(service.list_voices().await.unwrap().is_empty());
        assert_eq!(cloning.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_with_remote() {
        let (service, cloning, _) = service();
        let voice = service.clone_voice("V", "d", vec![]).await.unwrap();

        service.delete_voice(voice.id(), true).await.unwrap();

        assert_eq!(cloning.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_default_voice_selection() {
        let (service, _, _) = service();

        assert_eq!(
            service.default_voice().await.unwrap(),
            VoiceId::built_in()
        );

        let id = VoiceId::new("custom-voice");
        service.set_default_voice(&id).await.unwrap();
        assert_eq!(service.default_voice().await.unwrap(), id);
    }
}

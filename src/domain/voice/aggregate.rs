//! Voice Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{VoiceId, VoiceName};

/// 克隆音色
///
/// 不变量:
/// - `id` 由远端服务分配，创建后不可变
/// - 创建成功后立即持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClonedVoice {
    id: VoiceId,
    name: VoiceName,
    created_at: DateTime<Utc>,
}

impl ClonedVoice {
    /// 由远端克隆请求的结果创建
    pub fn new(id: VoiceId, name: VoiceName) -> Self {
        Self {
            id,
            name,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &VoiceId {
        &self.id
    }

    pub fn name(&self) -> &VoiceName {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloned_voice_creation() {
        let name = VoiceName::new("测试音色").unwrap();
        let voice = ClonedVoice::new(VoiceId::new("abc123"), name);

        assert_eq!(voice.id().as_str(), "abc123");
        assert_eq!(voice.name().as_str(), "测试音色");
    }
}

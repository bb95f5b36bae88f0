//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 内置默认音色 ID（远端服务预置，无需克隆）
pub const BUILT_IN_VOICE_ID: &str = "IKne3meq5aSn9XLyUdCD";

/// 音色唯一标识
///
/// 由远端服务分配的不透明字符串，唯一性由远端保证，本地不校验。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 内置默认音色
    pub fn built_in() -> Self {
        Self(BUILT_IN_VOICE_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色名称
///
/// 不变量: 去除首尾空白后非空，且不超过 30 个字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err("Voice name cannot be empty");
        }
        if name.chars().count() > 30 {
            return Err("Voice name cannot exceed 30 characters");
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let name = VoiceName::new("  Narrator  ").unwrap();
        assert_eq!(name.as_str(), "Narrator");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(VoiceName::new("   ").is_err());
        assert!(VoiceName::new("").is_err());
    }

    #[test]
    fn test_name_length_counted_in_chars() {
        // 30 个多字节字符，字节数远超 30
        let name: String = "声".repeat(30);
        assert!(VoiceName::new(name.clone()).is_ok());
        assert!(VoiceName::new(name + "声").is_err());
    }

    #[test]
    fn test_built_in_voice_id() {
        assert_eq!(VoiceId::built_in().as_str(), BUILT_IN_VOICE_ID);
    }
}

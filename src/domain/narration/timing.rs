//! Narration Context - Value Objects

use serde::{Deserialize, Serialize};

/// 单词时间轴条目
///
/// 不变量:
/// - `start < end`（秒）
/// - `start_index < end_index`（源文本字符偏移）
/// - 在有序序列中各条目互不重叠且单调递增
///
/// 仅由合成响应解析产生，仅被高亮游标消费，
/// 生命周期完全归属于产生它的 `SynthesisResult`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub start_index: usize,
    pub end_index: usize,
}

impl WordTiming {
    pub fn new(
        word: impl Into<String>,
        start: f64,
        end: f64,
        start_index: usize,
        end_index: usize,
    ) -> Self {
        Self {
            word: word.into(),
            start,
            end,
            start_index,
            end_index,
        }
    }

    /// 该词对应的源文本高亮区间
    pub fn span(&self) -> HighlightSpan {
        HighlightSpan {
            start_index: self.start_index,
            end_index: self.end_index,
        }
    }
}

/// 源文本高亮区间 `[start_index, end_index)`，字符偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start_index: usize,
    pub end_index: usize,
}

/// 一次合成请求的完整结果
///
/// 音频字节 + 有序的词级时间轴（后端返回裸音频时为空）。
/// 每次成功请求创建一份，交给调用方后客户端不再持有引用。
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub audio: Vec<u8>,
    pub timings: Vec<WordTiming>,
}

impl SynthesisResult {
    pub fn new(audio: Vec<u8>, timings: Vec<WordTiming>) -> Self {
        Self { audio, timings }
    }

    /// 后端返回裸音频、无时间轴元数据时的结果
    pub fn raw_audio(audio: Vec<u8>) -> Self {
        Self {
            audio,
            timings: Vec::new(),
        }
    }
}

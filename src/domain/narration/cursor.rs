//! Highlight Cursor - 前进式高亮游标
//!
//! 给定按 `start` 升序、互不重叠的时间轴序列，根据播放时刻
//! 计算当前应高亮的源文本区间。游标只前进，不回退：
//! 即使播放位置回跳（例如用户向后拖动进度条），已越过的
//! 条目也不会被重新命中。

use super::{HighlightSpan, WordTiming};

/// 前进式高亮游标
///
/// 不变量:
/// - 游标索引单调不减
/// - 任何条目最多被命中一个连续的时间窗口
#[derive(Debug)]
pub struct HighlightCursor {
    timings: Vec<WordTiming>,
    cursor: usize,
}

impl HighlightCursor {
    pub fn new(timings: Vec<WordTiming>) -> Self {
        Self { timings, cursor: 0 }
    }

    /// 根据播放时刻 `t`（秒）推进游标，返回当前高亮区间
    ///
    /// - `t` 落在游标条目的 `[start, end)` 内 → 返回该条目的区间
    /// - `t >= end` → 游标前进一格后重试（条目视为连续且单调）
    /// - `t` 早于游标条目的 `start`，或序列已耗尽 → `None`
    pub fn advance(&mut self, t: f64) -> Option<HighlightSpan> {
        while let Some(timing) = self.timings.get(self.cursor) {
            if t < timing.start {
                return None;
            }
            if t < timing.end {
                return Some(timing.span());
            }
            self.cursor += 1;
        }
        None
    }

    /// 序列是否已全部越过
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }
}

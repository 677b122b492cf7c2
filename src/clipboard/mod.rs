//! 剪贴板模块
//!
//! # 设计思路
//!
//! 取色器只需要往剪贴板写文本（单个颜色或导出的 JSON），
//! 因此对外只暴露一个 `ClipboardSink` trait：
//! - **`SystemClipboard`**：基于 `arboard` 写系统剪贴板，带有限重试
//! - **`MemoryClipboard`**：只记录写入内容，用于测试与 `--no-clipboard`
//!
//! # 实现思路
//!
//! - 写入是阻塞调用，由会话层放到 `spawn_blocking` 中执行，失败只记日志。
//! - trait 要求 `Send + Sync`，会话以 `Arc<dyn ClipboardSink>` 持有。

mod system;

use std::sync::Mutex;

use crate::error::AppError;

pub use system::{ClipboardRetryPolicy, SystemClipboard};

/// 文本剪贴板写入端。
pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), AppError>;
}

/// 内存剪贴板：按顺序记录每一次写入。
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部写入记录（按时间顺序）。
    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    /// 最近一次写入的内容。
    pub fn last(&self) -> Option<String> {
        self.writes
            .lock()
            .ok()
            .and_then(|writes| writes.last().cloned())
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), AppError> {
        let mut writes = self
            .writes
            .lock()
            .map_err(|_| AppError::Clipboard("内存剪贴板锁已中毒".to_string()))?;
        writes.push(text.to_string());
        log::debug!("📋 内存剪贴板写入: {}", text);
        Ok(())
    }
}

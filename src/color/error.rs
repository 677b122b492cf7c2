//! # 颜色错误模型
//!
//! 颜色字符串解析失败不应中断取样流程：调用方把它视为"无预览"并跳过。

/// 颜色解析与模式选择错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("无法解析颜色：{0}")]
    Parse(String),

    #[error("未知模式：{0}（可选：hex / srgb / lab / lch / oklch）")]
    UnknownMode(String),
}

//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError`，将各模块的错误（图片加载、颜色解析、设置、剪贴板、I/O）
//! 汇总为一个类型，供会话与命令行入口统一处理。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息，并为各模块错误提供 `From` 转换。
//! - 实现 `Serialize` 将错误序列化为字符串，便于以 JSON 形式输出。

use serde::Serialize;

use crate::color::ColorError;
use crate::image_handler::{ImageError, ImageLoadError};
use crate::settings::SettingsError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 剪贴板写入失败
    #[error("剪贴板操作失败: {0}")]
    Clipboard(String),

    /// 图片处理流水线错误（下载 / 解码 / 缩放）
    #[error("{0}")]
    Image(#[from] ImageError),

    /// 带来源标识的图片加载失败
    #[error("{0}")]
    ImageLoad(#[from] ImageLoadError),

    #[error("颜色错误: {0}")]
    Color(#[from] ColorError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    /// 文件系统 / 标准输入输出错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

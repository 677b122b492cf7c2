//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图片加载链路中的所有错误来源，避免字符串拼接式错误处理。
//! 对外再包一层 `ImageLoadError`，携带失败的来源标识（URL / 文件名），
//! 供上层直接弹窗提示用户。

/// 图片处理统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("网络错误：{0}")]
    Network(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("超时错误：{0}")]
    Timeout(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl ImageError {
    /// 稳定错误码，便于日志检索与脚本判断。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Decode(_) => "E_DECODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::Timeout(_) => "E_TIMEOUT",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
        }
    }
}

/// 图片加载失败：错误原因 + 失败的来源标识。
///
/// 会话收到该错误后弹出一次提示，之前的栅格与色板保持不变。
#[derive(Debug, thiserror::Error)]
#[error("无法加载图片 {identifier}：{source}")]
pub struct ImageLoadError {
    /// 来源标识（已脱敏的 URL、文件路径或拖入文件名）。
    pub identifier: String,
    #[source]
    pub source: ImageError,
}

impl ImageLoadError {
    pub fn new(identifier: impl Into<String>, source: ImageError) -> Self {
        Self {
            identifier: identifier.into(),
            source,
        }
    }
}

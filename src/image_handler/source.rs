//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将"外部输入类型"和"流水线中间结果"解耦：
//! - `ImageSource` 表示外部来源语义（URL、本地文件、拖入文件、Data URL）
//! - `RawImageData` 表示已加载但未解码的字节
//! - `DecodedImage` 表示解码完成、可交给栅格构建的图像

use image::DynamicImage;

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 网络地址来源（匿名跨域语义：不携带任何凭据）。
    Url(String),
    /// 本地文件路径来源。
    FilePath(String),
    /// 拖放进窗口的文件：文件名 + 已读取的字节。
    Dropped { name: String, bytes: Vec<u8> },
    /// Data URL（`data:image/...;base64,...`）或纯 Base64。
    DataUrl(String),
}

impl ImageSource {
    /// 按字符串形态自动识别来源：`http(s)://` → URL，`data:` → Data URL，其余视为文件路径。
    pub fn from_location(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else if lower.starts_with("data:") {
            Self::DataUrl(trimmed.to_string())
        } else {
            Self::FilePath(trimmed.to_string())
        }
    }

    /// 用于错误提示的来源标识。
    pub fn identifier(&self) -> String {
        match self {
            Self::Url(url) => super::loader::redact_url(url),
            Self::FilePath(path) => path.clone(),
            Self::Dropped { name, .. } => name.clone(),
            Self::DataUrl(_) => "<data-url>".to_string(),
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 解码阶段输出。
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// 来源标识（日志与提示用）。
    pub identifier: String,
    /// 解码后的图像。
    pub image: DynamicImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

//! # 配置模块
//!
//! ## 设计思路
//!
//! 将加载与解码阶段所有"可调策略"集中到 `ImageConfig`，会话启动时确定，之后只读。
//! 重采样质量（quality / balanced / speed）作为高层语义，映射到具体滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 的上限按"能打开相机原图"来定：工作栅格会再按 `maxSize` 缩小，
//!   这里只拦截明显异常的输入。
//! - `ResampleQuality` 负责档位字符串解析与反向输出。

use std::str::FromStr;

use image::imageops::FilterType;

use super::ImageError;

/// 图片加载配置。
///
/// 字段覆盖了下载、读取、解码与重采样四个阶段。
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// 下载/读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 网络下载总超时（秒）。
    pub download_timeout: u64,
    /// 最大重定向次数。
    pub max_redirects: usize,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 构建工作栅格时的重采样滤镜。
    pub resize_filter: FilterType,
}

/// 16384 x 16384，约 268 MP。
const DEFAULT_MAX_DECODED_PIXELS: u64 = 1 << 28;

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_file_size: 256 * 1024 * 1024,
            download_timeout: 30,
            max_redirects: 5,
            max_decoded_pixels: DEFAULT_MAX_DECODED_PIXELS,
            max_decoded_bytes: DEFAULT_MAX_DECODED_PIXELS * 4,
            resize_filter: FilterType::Triangle,
        }
    }
}

/// 重采样质量档位（面向用户语义）。
///
/// - `Quality`：CatmullRom，边缘最保真
/// - `Balanced`：双线性
/// - `Speed`：最近邻，取样结果与源像素完全一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleQuality {
    Quality,
    #[default]
    Balanced,
    Speed,
}

impl ResampleQuality {
    /// 将档位输出为稳定字符串，供展示与持久化。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    pub fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::CatmullRom,
            Self::Balanced => FilterType::Triangle,
            Self::Speed => FilterType::Nearest,
        }
    }
}

impl FromStr for ResampleQuality {
    type Err = ImageError;

    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use image_eyedropper::image_handler::ResampleQuality;
    ///
    /// let q: ResampleQuality = "speed".parse()?;
    /// assert_eq!(q.as_str(), "speed");
    /// # Ok::<(), image_eyedropper::image_handler::ImageError>(())
    /// ```
    fn from_str(profile: &str) -> Result<Self, Self::Err> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ImageError::InvalidFormat(format!(
                "未知重采样档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }
}

impl ImageConfig {
    /// 应用指定档位到实际滤镜。
    pub fn apply_resample_quality(&mut self, quality: ResampleQuality) {
        self.resize_filter = quality.filter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_profile_selects_filter() {
        let mut config = ImageConfig::default();
        assert_eq!(config.resize_filter, ResampleQuality::Balanced.filter());

        config.apply_resample_quality(ResampleQuality::Speed);
        assert_eq!(config.resize_filter, FilterType::Nearest);

        config.apply_resample_quality(ResampleQuality::Quality);
        assert_eq!(config.resize_filter, FilterType::CatmullRom);
    }

    #[test]
    fn quality_rejects_unknown_profile() {
        let result = "ultra".parse::<ResampleQuality>();
        assert!(matches!(result, Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn default_limits_admit_camera_photos() {
        let config = ImageConfig::default();
        // 48 MP / 100 MP 传感器原图
        for (width, height) in [(8000u64, 6000u64), (11648, 8736)] {
            assert!(width * height <= config.max_decoded_pixels);
            assert!(width * height * 4 <= config.max_decoded_bytes);
        }
    }
}

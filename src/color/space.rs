//! # 色彩空间与序列化模式
//!
//! ## 设计思路
//!
//! - `ColorSpace` 描述颜色数值所在的空间（决定三个通道的含义）。
//! - `Mode` 是面向用户的"输出格式"选择，比色彩空间多一个 `hex` 展示形式。
//! - 两者都提供稳定字符串与解析函数，写法与图片性能档位保持一致。

use std::fmt;
use std::str::FromStr;

use super::ColorError;

/// 颜色数值所在的色彩空间。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// sRGB，通道为 `[0,1]` 归一化浮点。
    Srgb,
    /// CIE Lab（D65），`L ∈ [0,100]`。
    Lab,
    /// CIE LCh（D65），色相为角度。
    Lch,
    /// OKLCH，`L ∈ [0,1]`。
    Oklch,
}

impl ColorSpace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::Lab => "lab",
            Self::Lch => "lch",
            Self::Oklch => "oklch",
        }
    }

    /// 是否为极坐标空间（第三个通道为色相）。
    pub(crate) fn is_polar(self) -> bool {
        matches!(self, Self::Lch | Self::Oklch)
    }
}

/// 序列化模式（下拉框中的五个选项）。
///
/// 会话级全局状态，仅影响实时预览与之后新增的色板。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Hex,
    Srgb,
    Lab,
    Lch,
    Oklch,
}

impl Mode {
    /// 下拉框中的展示顺序。
    pub const ALL: [Mode; 5] = [Mode::Hex, Mode::Srgb, Mode::Lab, Mode::Lch, Mode::Oklch];

    /// 输出为稳定字符串，供 UI 展示与配置持久化。
    ///
    /// # 示例
    /// ```rust
    /// use image_eyedropper::color::Mode;
    ///
    /// assert_eq!(Mode::Oklch.as_str(), "oklch");
    /// ```
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Srgb => "srgb",
            Self::Lab => "lab",
            Self::Lch => "lch",
            Self::Oklch => "oklch",
        }
    }

    /// 非 hex 模式对应的目标色彩空间；hex 以 sRGB 为基础。
    pub fn target_space(self) -> ColorSpace {
        match self {
            Self::Hex | Self::Srgb => ColorSpace::Srgb,
            Self::Lab => ColorSpace::Lab,
            Self::Lch => ColorSpace::Lch,
            Self::Oklch => ColorSpace::Oklch,
        }
    }
}

impl FromStr for Mode {
    type Err = ColorError;

    /// 从外部字符串解析模式（忽略大小写与首尾空白）。
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.trim().to_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "srgb" | "rgb" => Ok(Self::Srgb),
            "lab" => Ok(Self::Lab),
            "lch" => Ok(Self::Lch),
            "oklch" => Ok(Self::Oklch),
            other => Err(ColorError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

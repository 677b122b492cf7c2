//! 取色器设置
//!
//! # 设计思路
//!
//! 设置文件为 camelCase JSON，字段全部可选，缺省值即默认行为：
//!
//! ```json
//! { "maxSize": [1920, 1080], "url": "https://...", "mode": "oklch", "confirmMs": 1500 }
//! ```
//!
//! `maxSize` 既可以是单个数字（宽高同限），也可以是 `[w, h]`。
//! 命令行参数在加载后覆盖文件中的值。

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::{DEFAULT_PRECISION, Mode};
use crate::controller::ControllerConfig;
use crate::image_handler::ResampleQuality;

pub const DEFAULT_MAX_SIZE: u32 = 2048;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("读取设置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析设置文件失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("设置无效: {0}")]
    Invalid(String),
}

/// 栅格尺寸上限：单值或 `[w, h]`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxSize {
    Uniform(u32),
    Bounds([u32; 2]),
}

impl MaxSize {
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Self::Uniform(size) => (size, size),
            Self::Bounds([width, height]) => (width, height),
        }
    }
}

impl Default for MaxSize {
    fn default() -> Self {
        Self::Uniform(DEFAULT_MAX_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerSettings {
    pub max_size: MaxSize,
    /// 启动时加载的图片（URL 或本地路径）。
    pub url: Option<String>,
    pub mode: Mode,
    pub precision: usize,
    pub confirm_ms: u64,
    pub contrast_threshold: f64,
    pub window_width: f64,
    pub window_height: f64,
    /// 重采样档位：quality / balanced / speed。
    pub quality: Option<String>,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            max_size: MaxSize::default(),
            url: None,
            mode: Mode::default(),
            precision: DEFAULT_PRECISION,
            confirm_ms: 1500,
            contrast_threshold: 50.0,
            window_width: 1280.0,
            window_height: 800.0,
            quality: None,
        }
    }
}

impl PickerSettings {
    /// 从 JSON 文件加载设置。
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        let settings = Self::from_json(&content)?;
        log::info!("⚙️ 已加载设置文件: {}", path.display());
        Ok(settings)
    }

    pub fn from_json(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let (max_width, max_height) = self.max_size.bounds();
        if max_width == 0 || max_height == 0 {
            return Err(SettingsError::Invalid("maxSize 必须大于 0".to_string()));
        }
        if !(1..=17).contains(&self.precision) {
            return Err(SettingsError::Invalid("precision 必须在 1~17 之间".to_string()));
        }
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            return Err(SettingsError::Invalid("窗口尺寸必须大于 0".to_string()));
        }
        if !self.contrast_threshold.is_finite() {
            return Err(SettingsError::Invalid("contrastThreshold 必须是有限数".to_string()));
        }
        self.resample_quality()?;
        Ok(())
    }

    pub fn resample_quality(&self) -> Result<ResampleQuality, SettingsError> {
        match self.quality.as_deref() {
            Some(profile) => profile
                .parse()
                .map_err(|e| SettingsError::Invalid(format!("quality: {}", e))),
            None => Ok(ResampleQuality::default()),
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            mode: self.mode,
            precision: self.precision,
            confirm_delay: Duration::from_millis(self.confirm_ms),
            contrast_threshold: self.contrast_threshold,
            window_width: self.window_width,
            window_height: self.window_height,
        }
    }
}

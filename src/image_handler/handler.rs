//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageHandler` 只负责流程编排与配置管理，不关心图片之后如何被取色。
//! 处理链路固定为：
//! 1. 按来源加载原始字节（`loader`）
//! 2. 解码为完整图像（`pipeline`）
//!
//! ## 实现思路
//!
//! - 配置在构造时确定，之后只读；每次加载都用同一份配置。
//! - 记录 `load/decode/total` 阶段耗时，便于性能诊断。
//! - 所有失败都包装成 `ImageLoadError`，带上来源标识。

use std::time::Instant;

use super::{DecodedImage, ImageConfig, ImageError, ImageLoadError, ImageSource, loader};

/// 图片加载器。
pub struct ImageHandler {
    pub(super) config: ImageConfig,
}

impl ImageHandler {
    /// 根据配置创建加载器。
    ///
    /// # 示例
    /// ```rust
    /// use image_eyedropper::image_handler::{ImageConfig, ImageHandler, ResampleQuality};
    ///
    /// let mut config = ImageConfig::default();
    /// config.apply_resample_quality(ResampleQuality::Speed);
    /// let handler = ImageHandler::new(config);
    /// assert_eq!(handler.config().resize_filter, image::imageops::FilterType::Nearest);
    /// ```
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// 加载主入口：从任意来源加载并解码图片。
    pub async fn load(&self, source: ImageSource) -> Result<DecodedImage, ImageLoadError> {
        let identifier = source.identifier();
        self.load_inner(source, identifier.clone())
            .await
            .map_err(|err| {
                log::warn!("❌ 图片加载失败 [{}] {}：{}", err.code(), identifier, err);
                ImageLoadError::new(identifier, err)
            })
    }

    async fn load_inner(
        &self,
        source: ImageSource,
        identifier: String,
    ) -> Result<DecodedImage, ImageError> {
        let total_start = Instant::now();

        let raw = loader::fetch(source, &self.config).await?;
        let load_elapsed = total_start.elapsed();

        let decode_start = Instant::now();
        let decoded = self.decode(raw, identifier)?;
        let decode_elapsed = decode_start.elapsed();

        log::info!(
            "✅ 图片加载完成 - load={}ms decode={}ms total={}ms",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(decoded)
    }
}

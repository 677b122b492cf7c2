//! # 工作栅格
//!
//! ## 设计思路
//!
//! 原图可能非常大，取色只需要在有限分辨率上进行。加载完成后按 `maxSize`
//! 等比缩小一次，得到只读的 RGBA 栅格；之后所有取样都在这份栅格上完成。
//!
//! ## 实现思路
//!
//! - `ratio = min(1, max_w / src_w, max_h / src_h)`，宽高向下取整，永不放大。
//! - 向下取整为 0 时提升到 1，保证缩放目标非空。
//! - 缩放由 `image_handler::resize_rgba` 完成，无需缩放时直接复制像素。

use image::DynamicImage;
use image::imageops::FilterType;

use crate::color::ColorValue;
use crate::image_handler::{ImageError, resize_rgba};

/// 计算工作栅格尺寸。
///
/// # 示例
/// ```rust
/// use image_eyedropper::raster::scaled_dimensions;
///
/// assert_eq!(scaled_dimensions(4000, 3000, 2048, 2048), (2048, 1536));
/// assert_eq!(scaled_dimensions(100, 50, 2048, 2048), (100, 50));
/// ```
pub fn scaled_dimensions(
    source_width: u32,
    source_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if source_width == 0 || source_height == 0 {
        return (source_width, source_height);
    }

    let ratio = 1.0_f64
        .min(max_width as f64 / source_width as f64)
        .min(max_height as f64 / source_height as f64);

    let width = ((ratio * source_width as f64).floor() as u32).max(1);
    let height = ((ratio * source_height as f64).floor() as u32).max(1);
    (width, height)
}

/// 缩放后的只读 RGBA 栅格（行优先）。
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    source_width: u32,
    source_height: u32,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// 从解码后的图像构建工作栅格。
    pub fn build(
        image: &DynamicImage,
        max_width: u32,
        max_height: u32,
        filter: FilterType,
    ) -> Result<Self, ImageError> {
        let (source_width, source_height) = (image.width(), image.height());
        if source_width == 0 || source_height == 0 {
            return Err(ImageError::Decode("图片尺寸为 0，无法构建栅格".to_string()));
        }
        if max_width == 0 || max_height == 0 {
            return Err(ImageError::ResourceLimit(format!(
                "栅格尺寸上限必须大于 0：{}x{}",
                max_width, max_height
            )));
        }

        let (width, height) = scaled_dimensions(source_width, source_height, max_width, max_height);
        let pixels = resize_rgba(image, width, height, filter).into_raw();

        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("栅格尺寸导致内存溢出风险".to_string()))?;
        if pixels.len() != expected_len {
            return Err(ImageError::Decode("栅格像素数据长度异常".to_string()));
        }

        log::info!(
            "🧩 工作栅格：{}x{} -> {}x{}（filter={:?}）",
            source_width,
            source_height,
            width,
            height,
            filter
        );

        Ok(Self {
            source_width,
            source_height,
            width,
            height,
            pixels,
        })
    }

    pub fn source_width(&self) -> u32 {
        self.source_width
    }

    pub fn source_height(&self) -> u32 {
        self.source_height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 宽高比 `width / height`。
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// 读取原始 RGBA 值。
    ///
    /// # Panics
    ///
    /// 坐标超出栅格范围时 panic。
    pub fn pixel_rgba(&self, px: u32, py: u32) -> [u8; 4] {
        assert!(
            px < self.width && py < self.height,
            "sample ({px}, {py}) outside {}x{} raster",
            self.width,
            self.height
        );
        let offset = (py as usize * self.width as usize + px as usize) * 4;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        ]
    }

    /// 取样 `(px, py)` 处的颜色；alpha 被忽略。
    ///
    /// # Panics
    ///
    /// 坐标超出栅格范围时 panic。
    pub fn sample(&self, px: u32, py: u32) -> ColorValue {
        let [r, g, b, _] = self.pixel_rgba(px, py);
        ColorValue::from_rgb8(r, g, b)
    }
}

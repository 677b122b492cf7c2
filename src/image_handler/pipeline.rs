//! # 解码与缩放流水线模块
//!
//! ## 设计思路
//!
//! 将"字节 → 图像 → 缩放后的 RGBA"集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素与内存上限快速拒绝
//! 3. 完整解码
//! 4. 缩放交给 `resize_rgba`：优先 fast_image_resize，失败时回退 `image::resize_exact`

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, RgbaImage};
use std::io::Cursor;

use super::source::{DecodedImage, RawImageData};
use super::{ImageConfig, ImageError, ImageHandler};

impl ImageHandler {
    /// 将原始字节解码为完整图像。
    pub(super) fn decode(
        &self,
        raw: RawImageData,
        identifier: String,
    ) -> Result<DecodedImage, ImageError> {
        let config = &self.config;
        image::guess_format(&raw.bytes)
            .map_err(|e| ImageError::InvalidFormat(format!("不支持的图片格式：{}", e)))?;

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        let image = image::load_from_memory(&raw.bytes)
            .map_err(|e| ImageError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Decode("图片尺寸为 0".to_string()));
        }

        log::info!(
            "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            width,
            height
        );

        Ok(DecodedImage { identifier, image })
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), ImageError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    fn validate_pixel_limits(config: &ImageConfig, width: u32, height: u32) -> Result<(), ImageError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| ImageError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(ImageError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &ImageConfig,
        width: u32,
        height: u32,
    ) -> Result<(), ImageError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ImageError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(ImageError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}

/// 将图像缩放到精确的目标尺寸并输出 RGBA。
///
/// 尺寸未变化时直接转换，不做重采样。
pub fn resize_rgba(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> RgbaImage {
    if image.dimensions() == (target_width, target_height) {
        return image.to_rgba8();
    }

    match resize_with_fast_image_resize(image, target_width, target_height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
            image
                .resize_exact(target_width, target_height, filter)
                .to_rgba8()
        }
    }
}

fn resize_with_fast_image_resize(
    image: &DynamicImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ImageError> {
    let src = image.to_rgba8();
    let (src_width, src_height) = src.dimensions();

    let src_image =
        fr::images::Image::from_vec_u8(src_width, src_height, src.into_raw(), fr::PixelType::U8x4)
            .map_err(|e| ImageError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let options = fr::ResizeOptions::new().resize_alg(to_resize_alg(filter));

    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ImageError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ImageError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

// Nearest 必须逐像素取源值，不能走卷积
fn to_resize_alg(filter: FilterType) -> fr::ResizeAlg {
    match filter {
        FilterType::Nearest => fr::ResizeAlg::Nearest,
        FilterType::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        FilterType::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
        FilterType::Gaussian => fr::ResizeAlg::Convolution(fr::FilterType::Mitchell),
        FilterType::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
    }
}
